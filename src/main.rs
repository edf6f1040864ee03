use anyhow::{Context, Result};
use std::env;

use client_square::{load_book, AppointmentEntry, ClientBook, Config};

fn main() -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    // RUST_LOG wins over CLIENT_SQUARE_LOG when both are set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let command = env::args().nth(1).unwrap_or_else(|| "check".to_string());
    let book = open_book(&config)?;

    match command.as_str() {
        "check" => run_check(&config, &book),
        "clients" => run_clients(&book),
        "appointments" => run_appointments(&book),
        other => {
            eprintln!("❌ Unknown command: {other}");
            eprintln!("   Usage: client-square [check|clients|appointments]");
            std::process::exit(2);
        }
    }

    Ok(())
}

fn open_book(config: &Config) -> Result<ClientBook> {
    match load_book(&config.data_file)? {
        Some(book) => Ok(book),
        None => {
            tracing::warn!(
                path = %config.data_file.display(),
                "data file missing, starting with an empty book"
            );
            Ok(ClientBook::new())
        }
    }
}

fn run_check(config: &Config, book: &ClientBook) {
    println!("🏠 Client Square v{}", client_square::VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Data file: {}", config.data_file.display());
    println!("✓ {} clients", book.clients().len());
    println!("✓ {} appointments", book.appointments().len());

    let sellers = book.clients().iter().filter(|c| c.is_seller()).count();
    println!("   {} sellers, {} buyers", sellers, book.clients().len() - sellers);
}

fn run_clients(book: &ClientBook) {
    if book.clients().is_empty() {
        println!("No clients yet.");
        return;
    }
    for (i, client) in book.clients().iter().enumerate() {
        println!("{}. {}", i + 1, client);
    }
}

fn run_appointments(book: &ClientBook) {
    if book.appointments().is_empty() {
        println!("No appointments yet.");
        return;
    }
    for (i, AppointmentEntry { appointment, client }) in book.appointment_entries().enumerate() {
        println!("{}. {} ({})", i + 1, appointment, client.phone);
    }
}
