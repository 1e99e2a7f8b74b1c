use clap::Parser;

#[derive(Parser, Clone, Debug)]
pub struct Config {
    #[clap(env, long)]
    pub environment: String,

    #[clap(env, long)]
    pub database_url: String,

    /// Comma separated list of origins allowed by CORS
    #[clap(env, long, default_value = "http://localhost:3000")]
    pub origin_urls: String,

    #[clap(env, long, default_value_t = 8080)]
    pub port: u16,

    /// Defaults to four connections per CPU
    #[clap(env, long)]
    pub pool_max_size: Option<u32>,

    #[clap(env, long, default_value_t = 5)]
    pub db_connect_timeout_secs: u64,

    #[clap(env, long, default_value_t = 30)]
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size
            .unwrap_or_else(|| num_cpus::get() as u32 * 4)
            .max(1)
    }
}
