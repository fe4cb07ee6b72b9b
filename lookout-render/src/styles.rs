use crossterm::style::{ContentStyle, Stylize};

pub fn title() -> ContentStyle {
    ContentStyle::new().cyan().bold()
}

pub fn badge() -> ContentStyle {
    ContentStyle::new().yellow().bold()
}

pub fn subtitle() -> ContentStyle {
    ContentStyle::new().grey().bold()
}

pub fn label() -> ContentStyle {
    ContentStyle::new().yellow()
}

pub fn value() -> ContentStyle {
    ContentStyle::new().white()
}

pub fn dim() -> ContentStyle {
    ContentStyle::new().dark_grey()
}
