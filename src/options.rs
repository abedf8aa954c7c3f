use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(name = "gqlmetrics", about = "GraphQL server exporting request and resolver metrics")]
pub struct Options {
    /// Path of the config file
    #[structopt(default_value = "config.toml")]
    pub config: String,

    /// Overrides the bind address of the config file
    #[structopt(long)]
    pub bind: Option<String>,
}
