use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info};
use std::sync::Arc;

use outreach::core::{Config, EmailTemplate};
use outreach::features::campaign::CampaignEngine;
use outreach::features::notifier::{Notifier, SmtpMailer};
use outreach::features::reminders::{parse_weekday, ReminderScheduler};
use outreach::store::Store;

/// Registry id of the weekly campaign trigger
const WEEKLY_CAMPAIGN_JOB_ID: &str = "email_campaign";

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("📧 Outreach campaign bot starting...");

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("now") => {
            let interval = args
                .get(2)
                .and_then(|v| v.parse().ok())
                .unwrap_or(config.reminder_interval_minutes);
            run_now(&config, interval).await
        }
        Some("schedule") => run_schedule(&config, &args[2..]).await,
        _ => {
            print_usage();
            Ok(())
        }
    }
}

/// Send the campaign immediately, then stay alive while reminder jobs run
async fn run_now(config: &Config, interval_minutes: u64) -> Result<()> {
    info!("🚀 Sending emails immediately...");

    let (engine, scheduler) = build_engine(config)?;
    engine.recover_reminders(interval_minutes).await;
    engine.run_campaign(interval_minutes).await?;

    if scheduler.job_count() == 0 {
        info!("Nothing scheduled, done.");
        return Ok(());
    }

    info!("⏳ Reminder jobs pending - press Ctrl+C to stop");
    tokio::signal::ctrl_c().await?;
    scheduler.shutdown();
    info!("👋 Campaign bot stopped.");
    Ok(())
}

/// Install the weekly campaign trigger and block until interrupted
async fn run_schedule(config: &Config, args: &[String]) -> Result<()> {
    let (Some(day), Some(hour_arg)) = (args.first(), args.get(1)) else {
        print_usage();
        return Ok(());
    };

    let Some(weekday) = parse_weekday(day) else {
        error!("Unknown day '{day}', expected mon..sun");
        print_usage();
        return Ok(());
    };
    let Ok(hour) = hour_arg.parse::<u32>() else {
        error!("Hour '{hour_arg}' is not a number");
        print_usage();
        return Ok(());
    };
    let minute: u32 = args.get(2).and_then(|v| v.parse().ok()).unwrap_or(0);
    if hour > 23 || minute > 59 {
        error!("Time {hour}:{minute} out of range");
        print_usage();
        return Ok(());
    }
    let interval = args
        .get(3)
        .and_then(|v| v.parse().ok())
        .unwrap_or(config.reminder_interval_minutes);

    let (engine, scheduler) = build_engine(config)?;
    engine.recover_reminders(interval).await;

    let campaign_engine = Arc::clone(&engine);
    scheduler.schedule_weekly(weekday, hour, minute, WEEKLY_CAMPAIGN_JOB_ID, move || {
        let engine = Arc::clone(&campaign_engine);
        async move {
            if let Err(e) = engine.run_campaign(interval).await {
                error!("Campaign pass failed: {e}");
            }
        }
    });

    info!("📅 Email scheduler started!");
    info!("   📧 Campaign: every {} at {hour:02}:{minute:02} UTC", day.to_uppercase());
    info!("   🔔 Reminders: every {interval} minute(s) per contact");
    info!(
        "   🚫 Auto-mark as not_interested after {} reminders",
        config.max_reminders
    );
    info!("   Press Ctrl+C to stop");

    tokio::signal::ctrl_c().await?;
    scheduler.shutdown();
    info!("👋 Scheduler stopped.");
    Ok(())
}

fn build_engine(config: &Config) -> Result<(Arc<CampaignEngine>, ReminderScheduler)> {
    let store = Store::new(config.contacts_file.as_str(), config.tracking_file.as_str());
    let template = EmailTemplate::from_file(&config.template_file)?;
    let mailer = Arc::new(SmtpMailer::from_config(config)?);
    let notifier = Notifier::new(mailer, template, config);
    let scheduler = ReminderScheduler::new();
    let engine = CampaignEngine::new(store, notifier, scheduler.clone(), config.max_reminders);
    Ok((engine, scheduler))
}

fn print_usage() {
    println!("Usage:");
    println!("  campaign now [interval_minutes]                        send immediately");
    println!("  campaign schedule <day> <hour> [minute] [interval]     weekly trigger");
    println!();
    println!("  <day>        mon, tue, wed, thu, fri, sat, sun");
    println!("  <hour>       0-23 (24-hour clock, UTC)");
    println!("  [minute]     0-59 (default: 0)");
    println!("  [interval]   minutes between reminders (default: REMINDER_INTERVAL_MINUTES)");
    println!();
    println!("Examples:");
    println!("  campaign now                  # send now, 1-minute reminders");
    println!("  campaign schedule mon 9       # every Monday at 09:00");
    println!("  campaign schedule wed 14 30 2 # Wednesdays 14:30, 2-minute reminders");
}
