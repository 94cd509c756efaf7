use std::path::PathBuf;

use anyhow::ensure;

use crate::util;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PredictArg {
    /// Trained model file written by `train`
    #[arg(long)]
    model: PathBuf,
    /// Comma-separated input values
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
    input: Vec<f64>,
}

pub(crate) fn run(arg: &PredictArg) -> anyhow::Result<()> {
    let PredictArg { model, input } = arg;
    let model = util::read_trained_model_file(model)?;
    let network = model.to_network()?;
    ensure!(
        input.len() == network.config().inputs,
        "Model expects {} inputs, got {}",
        network.config().inputs,
        input.len()
    );

    let output = network.predict(input);
    util::write_json(&output, None)?;
    Ok(())
}
