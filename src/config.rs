use std::path::PathBuf;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Clone, Debug)]
#[clap(author, version, about = "Find restaurants near an address and summarise them as a PDF")]
pub struct Config {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Command {
    /// Run the restaurant search API
    Serve(ServeConfig),
    /// Fetch search results from a running API and render the PDF report
    Report(ReportConfig),
}

#[derive(Args, Clone, Debug)]
pub struct ServeConfig {
    #[clap(env, long, hide_env_values = true)]
    pub google_api_key: String,

    #[clap(env, long, default_value = "https://maps.googleapis.com/maps/api/place")]
    pub places_base_url: String,

    #[clap(env, long, default_value = "127.0.0.1")]
    pub host: String,

    #[clap(env, long, default_value_t = 5000)]
    pub port: u16,

    #[clap(env, long, default_value = "http://localhost:3000,http://127.0.0.1:3000")]
    pub origin_urls: String,

    #[clap(env, long, default_value_t = 10_000.0)]
    pub search_radius_meters: f64,

    #[clap(env, long, default_value_t = 6)]
    pub max_results: usize,

    /// Wait before following a nearby-search continuation token
    #[clap(env, long, default_value_t = 2000)]
    pub page_token_delay_ms: u64,

    #[clap(env, long, default_value_t = 30)]
    pub request_timeout_secs: u64,

    #[clap(env, long, default_value_t = 16)]
    pub max_concurrent_searches: usize,

    #[clap(env, long, value_delimiter = ',', default_value = "descuento,promoción,discount,promotion")]
    pub promotion_keywords: Vec<String>,
}

#[derive(Args, Clone, Debug)]
pub struct ReportConfig {
    #[clap(
        env = "REPORT_API_URL",
        long,
        default_value = "http://127.0.0.1:5000/buscar_restaurantes?direccion=97302,+Fraccionamiento+Las+Américas,+Mérida"
    )]
    pub api_url: String,

    #[clap(env = "REPORT_OUTPUT", long, default_value = "reporte_personalizado.pdf")]
    pub output: PathBuf,

    /// Image drawn in the top-left corner of every page
    #[clap(env = "REPORT_LOGO", long)]
    pub logo: Option<PathBuf>,

    #[clap(env = "REPORT_TIMEOUT_SECS", long, default_value_t = 1000)]
    pub timeout_secs: u64,
}
