use gxp_spots::{ProxyConfig, SpotsError, WeekDataService};

#[tokio::main]
async fn main() -> Result<(), SpotsError> {
    env_logger::init();

    let config = ProxyConfig::default();
    let service = WeekDataService::with_disk_cache(config).await?;

    let report = service.sync().await;
    for week in &report.weeks {
        println!("Week of {}: {} classes", week.monday, week.classes);
    }

    let this_week = service.get_week_data(chrono::Utc::now(), false).await;
    match serde_json::to_string_pretty(&this_week) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to render week: {}", e),
    }

    Ok(())
}
