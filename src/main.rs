mod app_data;
mod clock;
mod dashboard;
mod error;
mod mock_api;
mod mock_data;
mod settings;

use app_data::{AppState, DiskBasedDb, KvDbOps, MemoryDb, StorageGateway};
use clock::{HeaderClock, CLOCK_PERIOD};
use dashboard::Dashboard;
use error::Result;
use log::{error, info, warn};
use mock_api::MockApi;
use settings::{Settings, StoreLocation};
use tokio::io::AsyncBufReadExt;

async fn run<Db: KvDbOps>(storage: StorageGateway<Db>) -> Result<()> {
    let app_state = AppState::new(storage);

    let mut dashboard = Dashboard::new(app_state, MockApi::new());
    let clock = HeaderClock::start(CLOCK_PERIOD);

    println!("[{}] {}", clock.current(), dashboard.banner());
    info!("Dashboard ready. Type a prompt or a /command, empty line to quit.");

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            break;
        }

        match dashboard.handle(&line).await {
            Ok(output) => println!("[{}] {}", clock.current(), output),
            Err(e) => error!("{:#}", e),
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    info!("Starting AutomatUp dashboard");

    let settings = Settings::from_env()?;

    match &settings.store {
        StoreLocation::Disk(path) => {
            let db = DiskBasedDb::open_from(path)?;
            run(StorageGateway::with_namespace(db, &settings.namespace)).await?;
        }
        StoreLocation::Memory => {
            warn!("Using in-memory storage, state is lost on exit");
            let db = MemoryDb::new();
            run(StorageGateway::with_namespace(db, &settings.namespace)).await?;
        }
    }

    info!("AutomatUp dashboard stopped");

    Ok(())
}
