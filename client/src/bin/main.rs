use std::io;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

use zeronight_client::api::HttpGameApi;
use zeronight_client::clock::TokioClock;
use zeronight_client::config::ClientConfig;
use zeronight_client::console::{events_from_line, ConsoleView};
use zeronight_client::engine::{EngineSettings, Event, GameEngine};
use zeronight_client::error::ClientError;
use zeronight_client::logging;
use zeronight_client::runtime::GameRuntime;

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    let config = ClientConfig::from_env()?;
    logging::setup()?;
    info!(api = %config.api_base_url, "starting zeronight client");

    let api = HttpGameApi::new(&config)?;
    let mut runtime = GameRuntime::new(api);
    let mut engine = GameEngine::new(
        ConsoleView::new(io::stdout()),
        runtime.scheduler(),
        TokioClock,
        EngineSettings::from(&config),
    );

    let input = runtime.sender();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => match events_from_line(&line) {
                    Some(events) => {
                        for event in events {
                            if input.send(event).is_err() {
                                return;
                            }
                        }
                    }
                    None => warn!(%line, "unrecognised input"),
                },
                Ok(None) => break,
                Err(e) => {
                    error!("Error reading stdin: {:?}", e);
                    break;
                }
            }
        }
        let _ = input.send(Event::Shutdown);
    });

    runtime.run(&mut engine).await;
    Ok(())
}
