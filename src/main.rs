use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use igen::{Backdrop, Config, EntryView, GallerySession, GenerationId};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded successfully"),
        Err(_) => log::warn!("⚠️  No .env file found, using system environment variables"),
    }

    igen::logger::init_with_config(
        igen::logger::LoggerConfig::development().with_level(igen::logger::LogLevel::Info),
    )?;

    igen::logger::log_startup_info("igen", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env();
    igen::logger::log_config_info(&config);

    let mut session = match GallerySession::from_config(config) {
        Ok(session) => {
            log::info!("✅ Session ready");
            session
        }
        Err(e) => {
            log::error!("❌ Failed to initialize session: {}", e);
            return Err(e.into());
        }
    };

    let mut backdrop = Backdrop::new(terminal_width());
    println!("{}", backdrop.render());
    print_help();

    let stdin = io::stdin();
    loop {
        // The backdrop is stateless; a width change is its only input.
        backdrop.resize(terminal_width());

        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim().to_string();

        match line.split_whitespace().collect::<Vec<_>>().as_slice() {
            ["/quit"] | ["/q"] => break,
            ["/help"] => print_help(),
            ["/clear"] => {
                session.clear();
                println!("{}", backdrop.render());
                print_gallery(&session);
            }
            ["/copy", n] => {
                match entry_id(&session, n) {
                    Some(id) => {
                        if session.copy_prompt(id) {
                            log::info!("📋 Prompt copied to clipboard");
                        } else {
                            log::warn!("Copy did not complete");
                        }
                    }
                    None => log::warn!("No such entry: {}", n),
                }
                print_gallery(&session);
            }
            ["/save", n, rest @ ..] => {
                match entry_id(&session, n) {
                    Some(id) => {
                        let path = rest.first().map(|p| PathBuf::from(*p));
                        match session.save_image(id, path) {
                            Ok(path) => log::info!("💾 Image saved to: {}", path.display()),
                            Err(e) => log::error!("❌ Failed to save image: {}", e),
                        }
                    }
                    None => log::warn!("No such entry: {}", n),
                }
            }
            ["/view", n] => {
                let opened = entry_id(&session, n)
                    .map(|id| session.open_modal(id))
                    .unwrap_or(false);
                match session.modal() {
                    Some(image) if opened => {
                        println!("┌─ {}", image.prompt);
                        println!("│  {}", image.timestamp.format("%Y-%m-%d %H:%M:%S"));
                        println!("│  {} base64 chars", image.image_data.len());
                        println!("└─ (/close to dismiss)");
                    }
                    _ => log::warn!("No completed entry: {}", n),
                }
            }
            ["/close"] => {
                session.close_modal();
                print_gallery(&session);
            }
            [] => {}
            _ if line.starts_with('/') => log::warn!("Unknown command: {}", line),
            _ => {
                match session.submit(&line).await {
                    Ok(_) => {}
                    Err(e) => log::debug!("Submission failed: {}", e),
                }
                if let Some(message) = session.gallery().error() {
                    println!("{}", message);
                }
                print_gallery(&session);
            }
        }
    }

    log::info!("👋 Session ended, gallery discarded");
    Ok(())
}

/// Map a 1-based gallery position to the entry id behind it.
fn entry_id(session: &GallerySession, n: &str) -> Option<GenerationId> {
    let index: usize = n.parse().ok()?;
    session
        .render()
        .get(index.checked_sub(1)?)
        .map(|entry| entry.id())
}

fn print_gallery(session: &GallerySession) {
    let model = session.render();
    if model.is_empty() {
        println!("(gallery is empty)");
        return;
    }

    for (i, entry) in model.iter().enumerate() {
        match entry {
            EntryView::Pending {
                prompt,
                submitted_at,
                ..
            } => {
                println!("{:>3}. ⏳ {} ({})", i + 1, prompt, submitted_at);
            }
            EntryView::Image {
                prompt,
                src,
                timestamp,
                copied,
                ..
            } => {
                let mark = if *copied { " 📋 copied!" } else { "" };
                println!(
                    "{:>3}. 🖼  {} ({}) [{} chars]{}",
                    i + 1,
                    prompt,
                    timestamp,
                    src.len(),
                    mark
                );
            }
        }
    }
}

fn print_help() {
    println!("Type a prompt to generate an image, or:");
    println!("  /copy <n>          copy entry n's prompt to the clipboard");
    println!("  /save <n> [path]   save entry n's image as a PNG");
    println!("  /view <n>          open the full view for entry n");
    println!("  /close             close the full view");
    println!("  /clear             clear the gallery");
    println!("  /quit              exit");
}

fn terminal_width() -> usize {
    env::var("COLUMNS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(64)
}
