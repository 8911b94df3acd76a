use super::{App, print_json};
use agrochar_client::AgroCharApi;
use agrochar_core::SessionStore;
use agrochar_core::model::{LoginRequest, RegisterRequest, Role};
use anyhow::Result;
use colored::Colorize;

pub async fn login(app: &App, phone: String, password: String) -> Result<()> {
    let response = app.api.login(&LoginRequest::new(phone, password)).await?;

    let who = response.name.as_deref().unwrap_or("user");
    println!(
        "{}",
        format!("Logged in as {} ({})", who, response.role).green()
    );
    Ok(())
}

pub async fn logout(app: &App) -> Result<()> {
    app.api.logout().await;
    Ok(())
}

/// Reports the locally stored session without touching the network.
pub fn whoami(app: &App) -> Result<()> {
    let session = app.session.load();
    match (session.is_authenticated(), session.role) {
        (true, Some(role)) => println!("Logged in ({})", role),
        (true, None) => println!("Logged in (role unknown)"),
        (false, _) => println!("{}", "Not logged in".yellow()),
    }
    Ok(())
}

pub async fn me(app: &App) -> Result<()> {
    let profile = app.api.me().await?;
    print_json(&profile)
}

pub async fn register(
    app: &App,
    name: String,
    phone: String,
    password: String,
    role: Role,
) -> Result<()> {
    let request = RegisterRequest {
        name,
        phone,
        password,
        role,
    };
    let created = app.api.register(&request).await?;

    println!("{}", format!("Registered as {}", role).green());
    print_json(&created)
}
