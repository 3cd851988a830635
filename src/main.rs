//! olist-dashboard - date-filtered sales dashboard over the Olist order table.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use olist_dashboard::currency::CurrencyFormat;
use olist_dashboard::dashboard::Dashboard;
use olist_dashboard::filter::parse_date;
use olist_dashboard::server::{self, ServerConfig};
use olist_dashboard::source::SourceOptions;
use olist_dashboard::visualization::PageConfig;

#[derive(Parser)]
#[command(name = "olist-dashboard")]
#[command(about = "Date-filtered sales dashboard for the Olist e-commerce dataset")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Options shared by every command.
#[derive(Args)]
struct DataArgs {
    /// Path to the order line-item CSV
    #[arg(long, env = "OLIST_DASHBOARD_DATA", default_value = "./dashboard/all_data.csv")]
    data: PathBuf,

    /// strftime format of order_purchase_timestamp (default: ISO-8601 variants)
    #[arg(long, env = "OLIST_DASHBOARD_TIMESTAMP_FORMAT")]
    timestamp_format: Option<String>,

    /// ISO currency code for money metrics
    #[arg(long, env = "OLIST_DASHBOARD_CURRENCY", default_value = "BRL")]
    currency: String,

    /// Locale used to format money metrics
    #[arg(long, env = "OLIST_DASHBOARD_LOCALE", default_value = "es_CO")]
    locale: String,

    /// Page title
    #[arg(long, env = "OLIST_DASHBOARD_TITLE")]
    title: Option<String>,

    /// URL of the sidebar header image
    #[arg(long, env = "OLIST_DASHBOARD_HEADER_IMAGE")]
    header_image: Option<String>,
}

impl DataArgs {
    fn open(&self) -> anyhow::Result<Dashboard> {
        let options = SourceOptions {
            timestamp_format: self.timestamp_format.clone(),
        };
        let dashboard = Dashboard::open(&self.data, &options)
            .with_context(|| format!("failed to load {}", self.data.display()))?;
        Ok(dashboard
            .with_currency(CurrencyFormat::new(&self.currency, &self.locale))
            .with_page(self.page()))
    }

    fn page(&self) -> PageConfig {
        let mut page = PageConfig::default();
        if let Some(title) = &self.title {
            page.title = title.clone();
        }
        if let Some(image) = &self.header_image {
            page.header_image = image.clone();
        }
        page
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive dashboard server
    Serve {
        #[command(flatten)]
        data: DataArgs,

        /// Host address to bind to
        #[arg(long, env = "OLIST_DASHBOARD_HOST", default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(short, long, env = "OLIST_DASHBOARD_PORT", default_value = "8501")]
        port: u16,
    },

    /// Render one selection to a standalone HTML file
    Export {
        #[command(flatten)]
        data: DataArgs,

        /// First day of the selection (YYYY-MM-DD), defaults to the first purchase
        #[arg(long)]
        start: Option<String>,

        /// Last day of the selection (YYYY-MM-DD), defaults to the last purchase
        #[arg(long)]
        end: Option<String>,

        /// Output path for the HTML file
        #[arg(short, long, default_value = "dashboard.html")]
        output: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Serve { data, host, port } => {
            let dashboard = data.open()?;
            server::serve(dashboard, ServerConfig { host, port }).await?;
        }

        Commands::Export {
            data,
            start,
            end,
            output,
        } => {
            let dashboard = data.open()?;
            let start = start.as_deref().map(parse_date).transpose()?;
            let end = end.as_deref().map(parse_date).transpose()?;
            let range = dashboard.selection(start, end);

            let html = dashboard.render_html(range)?;
            tokio::fs::write(&output, html)
                .await
                .with_context(|| format!("failed to write {}", output.display()))?;
            tracing::info!(range = ?range, "wrote {}", output.display());
        }
    }

    Ok(())
}
