use reqwest::blocking::Client;
use usaco_util::scrape::{ScrapeError, fetch_problem};
use usaco_util::store::{DataPaths, SiteData};

/// Adds one USACO problem to the site's data files, given its cpid on
/// usaco.org. Run from the root of the site checkout.
fn main() {
    tracing_subscriber::fmt::init();

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        tracing::error!("Usage: {} usaco_problem_id", args[0]);
        return;
    }
    let cpid = &args[1];

    // Load the data files up front, so a bad checkout fails before the fetch
    let paths = DataPaths::default();
    let data = match SiteData::load(&paths) {
        Ok(data) => data,
        Err(err) => {
            tracing::error!("Could not load the site's data files: {}", err);
            return;
        }
    };

    let client = Client::new();
    let scraped = match fetch_problem(&client, cpid) {
        Ok(scraped) => scraped,
        Err(ScrapeError::Http(err)) => {
            tracing::error!("Error retrieving the problem page: {}", err);
            return;
        }
        Err(err) => {
            tracing::error!("Problem page didn't match the expected markup: {}", err);
            return;
        }
    };
    tracing::info!(
        "Problem {} {} {} {} {}",
        scraped.number,
        scraped.title,
        scraped.year,
        scraped.month,
        scraped.division,
    );

    let data = match data.add_problem(cpid, &scraped) {
        Ok(data) => data,
        Err(err) => {
            tracing::error!("Could not record the problem: {}", err);
            return;
        }
    };
    if let Err(err) = data.commit(&paths) {
        tracing::error!("Failed to write the data files: {}", err);
        return;
    }
    tracing::info!("Problem usaco-{} added!", cpid);
}
