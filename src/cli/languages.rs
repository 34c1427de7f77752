use crate::chat::{DEFAULT_LANGUAGE, SUPPORTED_LANGUAGES};

pub fn run() {
    for lang in SUPPORTED_LANGUAGES {
        let marker = if lang.id == DEFAULT_LANGUAGE.id() { " (default)" } else { "" };
        println!("{:<10} {} ({}){}", lang.id, lang.native, lang.label, marker);
    }
}
