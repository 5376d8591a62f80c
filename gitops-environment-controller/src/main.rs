use std::{error::Error, process::exit};

use kube::Client;

mod controller;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    configure_logger();

    let client = create_client().await;

    controller::main_controller(client).await;

    Ok(())
}

async fn create_client() -> Client {
    match Client::try_default().await {
        Ok(client) => client,
        Err(error) => {
            log::error!("Couldn't create client! {error:?}");
            exit(6)
        }
    }
}

fn configure_logger() {
    env_logger::builder()
        .default_format()
        .format_module_path(false)
        .filter_level(log::LevelFilter::Info)
        .init()
}
