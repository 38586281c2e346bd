use clap::Parser;

/// Inspect metadata of weather/climate datasets (NetCDF, NetCDF-4/HDF5,
/// zarr stores).
#[derive(Parser)]
#[command(name = "ncmeta", version, about, long_about = None)]
pub struct Cli {
    /// Input files or zarr stores that will be inspected
    #[arg(value_name = "input", required = true)]
    pub input: Vec<String>,

    /// Write an HTML report per input instead of printing text.
    /// An existing report file with the same name is overwritten.
    #[arg(long)]
    pub html: bool,
}
