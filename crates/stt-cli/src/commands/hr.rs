//! HR commands for listing the choices a submission can book against.

use std::io::Write;

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use tokio::runtime::Runtime;

use stt_hr::Client;

use crate::{Config, HrConfig};

/// HR lookups.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum HrAction {
    /// List employees (values for hr.user_id).
    Employees,
    /// List the configured employee's projects (values for hr.project_id).
    Projects,
    /// List time-tracking categories (values for hr.category_id).
    Categories,
}

/// Builds a client from configuration and refreshes its access token.
pub async fn connect(hr: &HrConfig) -> Result<Client> {
    let mut client = Client::new(&hr.client_id, &hr.client_secret)
        .context("HR credentials are incomplete (hr.client_id, hr.client_secret)")?
        .with_base_url(&hr.base_url)
        .with_access_token(&hr.access_token);
    client
        .refresh_token()
        .await
        .context("failed to refresh HR access token")?;
    Ok(client)
}

pub fn run<W: Write>(writer: &mut W, action: HrAction, config: &Config) -> Result<()> {
    let hr = &config.hr;
    if matches!(action, HrAction::Projects) && hr.user_id.trim().is_empty() {
        bail!("hr.user_id is not set; pick one from `stt hr employees`");
    }

    let runtime = Runtime::new().context("failed to initialize tokio runtime")?;
    let rows = runtime.block_on(async {
        let client = connect(hr).await?;
        let rows: Vec<(String, String)> = match action {
            HrAction::Employees => client
                .employees()
                .await?
                .into_iter()
                .map(|employee| {
                    let name = employee.full_name();
                    (employee.id, name)
                })
                .collect(),
            HrAction::Projects => client
                .projects(&hr.user_id)
                .await?
                .into_iter()
                .map(|project| (project.id, project.name))
                .collect(),
            HrAction::Categories => client
                .categories()
                .await?
                .into_iter()
                .map(|category| (category.id, category.name))
                .collect(),
        };
        anyhow::Ok(rows)
    })?;

    if rows.is_empty() {
        writeln!(writer, "Nothing found.")?;
        return Ok(());
    }
    let width = rows.iter().map(|(id, _)| id.chars().count()).max().unwrap_or(0);
    for (id, name) in rows {
        writeln!(writer, "{id:<width$}  {name}")?;
    }
    Ok(())
}
