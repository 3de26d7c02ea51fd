use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;
use parlance_engine::SessionEvent;

pub async fn run(
    path: &Path,
    offline: bool,
    location: Option<&str>,
    seed: Option<u64>,
    trace: bool,
) -> Result<(), String> {
    let mut session = super::start_session(path, offline, location, seed, trace)?;

    if offline {
        println!("  {}", "(offline: only fixed command forms work)".dimmed());
        println!();
    }
    print!("{}", session.intro());
    println!();

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        match session.process(line.trim()).await {
            Ok(output) => {
                print!("{}", output.text);
                println!();
                match output.event {
                    Some(SessionEvent::Quit) => break,
                    Some(SessionEvent::Restart) => {
                        session = super::start_session(path, offline, location, seed, trace)?;
                        print!("{}", session.intro());
                        println!();
                    }
                    Some(SessionEvent::SaveRequested | SessionEvent::RestoreRequested) => {
                        println!("  {}", "(this frontend keeps no save files)".dimmed());
                        println!();
                    }
                    None => {}
                }
            }
            Err(e) => {
                println!("{}\n", e.to_string().yellow());
            }
        }
    }

    Ok(())
}
