mod config;
mod console;

use config::{Config, Source};
use db::{Database, MemoryStore, NoTls, QuestionStore};
use lobby::{Lobby, Status};
use std::{fs::File, io::BufReader, sync::Arc};
use tokio::runtime::Runtime;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = Config::from_env()?;
    let runtime = Runtime::new()?;
    runtime.block_on(run(config))
}

async fn connect(source: Source) -> anyhow::Result<Arc<dyn QuestionStore>> {
    Ok(match source {
        Source::File(path) => {
            let store = MemoryStore::from_reader(BufReader::new(File::open(&path)?))?;
            log::info!("Loaded question bank from {}.", path.display());
            Arc::new(store)
        }
        Source::Postgres { user, pass, host, data, port } => {
            let (client, conn) = db::Config::new()
                .user(&user)
                .password(&pass)
                .host(&host)
                .dbname(&data)
                .port(port)
                .connect(NoTls)
                .await?;
            tokio::spawn(async move {
                if let Err(err) = conn.await {
                    log::error!("Database connection closed: {err}");
                }
            });
            log::info!("Connected to database {data} at {host}:{port}.");
            Arc::new(Database::from(client))
        }
    })
}

async fn run(config: Config) -> anyhow::Result<()> {
    let Config { source, quiz, user, candidate, report } = config;
    let lobby = Lobby::new(connect(source).await?);

    let definition = lobby.store().get_quiz(&quiz).await?;
    println!(
        "{}: {} questions, {} minutes, {} marks each.",
        definition.title, definition.total_questions, definition.duration_minutes, definition.marks_per_question,
    );
    lobby.begin(user.clone(), definition)?;

    let state = console::drive(&lobby, &user, &quiz).await?;
    match state.status() {
        Status::Finished => {
            let result = lobby.report(&user, &quiz, candidate)?;
            println!("\n{result}\n\n{}", result.share_text());
            if let Some(path) = report {
                std::fs::write(&path, serde_json::to_vec_pretty(&result)?)?;
                log::info!("Wrote report to {}.", path.display());
            }
        }
        Status::Error => println!("{}", state.error().unwrap_or_default()),
        _ => {}
    }

    lobby.abandon(&user, &quiz);
    Ok(())
}
