//! One-shot notification worker run by cron.
//!
//! `dispatch_notifications reminders [YYYY-MM-DD]` sends the reminders due
//! for the given day, `dispatch_notifications agenda [YYYY-MM-DD]` mails the
//! agenda of that day to the configured recipients. Both default to today.

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

use enoteca_backoffice::db::establish_connection_pool;
use enoteca_backoffice::models::config::ServerConfig;
use enoteca_backoffice::notifications::mailer::ZmqMailer;
use enoteca_backoffice::repository::DieselRepository;
use enoteca_backoffice::services::notifications::{
    MailContext, send_daily_agenda, send_due_reminders,
};

/// Sends scheduled event notifications once and exits.
#[derive(Debug, Parser)]
#[command(name = "dispatch_notifications", version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    job: Job,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
enum Job {
    /// Send reminders for confirmed events taking place seven days after DATE
    Reminders {
        /// Day the sweep runs for (YYYY-MM-DD), defaults to today
        date: Option<NaiveDate>,
    },
    /// Mail the agenda of DATE to the configured recipients
    Agenda {
        /// Day of the agenda (YYYY-MM-DD), defaults to today
        date: Option<NaiveDate>,
    },
}

fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let Cli { job } = Cli::parse();

    let server_config = match ServerConfig::load() {
        Ok(server_config) => server_config,
        Err(err) => {
            log::error!("Error loading server config: {err}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    let mailer = match ZmqMailer::connect(&server_config.zmq_emailer_pub) {
        Ok(mailer) => mailer,
        Err(e) => {
            log::error!("Failed to start mailer: {e}");
            std::process::exit(1);
        }
    };
    let ctx = MailContext {
        mailer: &mailer,
        venue_name: &server_config.venue_name,
    };

    let today = Utc::now().date_naive();
    match job {
        Job::Reminders { date } => {
            let date = date.unwrap_or(today);
            match send_due_reminders(date, &repo, ctx) {
                Ok(summary) => log::info!(
                    "Reminders for {date}: {} sent, {} failed, {} skipped",
                    summary.sent,
                    summary.failed,
                    summary.skipped
                ),
                Err(e) => {
                    log::error!("Reminder sweep failed: {e}");
                    std::process::exit(1);
                }
            }
        }
        Job::Agenda { date } => {
            let date = date.unwrap_or(today);
            match send_daily_agenda(date, None, &repo, ctx) {
                Ok(dispatch) => log::info!(
                    "Agenda of {date} with {} event(s) sent to {}",
                    dispatch.total_events,
                    dispatch.recipients.join(", ")
                ),
                Err(e) => {
                    log::error!("Daily agenda failed: {e}");
                    std::process::exit(1);
                }
            }
        }
    }

    // a PUB socket drops queued messages when it is closed right away
    std::thread::sleep(std::time::Duration::from_secs(1));
}
