use anyhow::Result;
use chrono::Local;
use diary_form::title::generate_auto_title;

pub fn run(date: Option<&str>, locale: &str) -> Result<()> {
    let title = match date {
        Some(date) => generate_auto_title(date, locale)?,
        None => generate_auto_title(&Local::now().date_naive(), locale)?,
    };
    println!("{title}");
    Ok(())
}
