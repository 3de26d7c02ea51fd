use std::path::Path;

use colored::Colorize;
use parlance_engine::SessionEvent;

pub async fn run(
    path: &Path,
    inputs: &[String],
    offline: bool,
    seed: Option<u64>,
    trace: bool,
) -> Result<(), String> {
    let mut session = super::start_session(path, offline, None, seed, trace)?;

    print!("{}", session.intro());
    println!();

    for input in inputs {
        println!("{} {input}", ">".dimmed());
        let output = session
            .process(input)
            .await
            .map_err(|e| e.to_string())?;
        print!("{}", output.text);
        println!();

        if output.event == Some(SessionEvent::Quit) {
            break;
        }
    }

    Ok(())
}
