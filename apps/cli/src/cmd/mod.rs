use anyhow::Result;
use serde::Serialize;

use crate::args::Command;
use crate::settings::Settings;

mod replay;
mod timezone;
mod title;

pub async fn dispatch(command: Command, settings: Settings) -> Result<()> {
    match command {
        Command::Replay { script, date } => replay::run(settings.page, &script, date),
        Command::Title { date, locale } => {
            title::run(date.as_deref(), locale.as_deref().unwrap_or(&settings.page.locale))
        }
        Command::Timezone {
            preference,
            no_auto_detect,
            detected,
            sync,
        } => {
            timezone::run(
                &settings.timezone,
                preference.as_deref(),
                !no_auto_detect,
                detected,
                sync,
            )
            .await
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
