use crate::args::CalcArgs;
use crate::calc::evaluate;
use crate::commands::Out;
use crate::Result;
use anyhow::Context;

/// Evaluates the expression and reports the result.
pub fn calc(args: &CalcArgs) -> Result<Out<f64>> {
    let value = evaluate(args.expression())
        .with_context(|| format!("Unable to evaluate '{}'", args.expression()))?;
    Ok(Out::new(format!("{} = {value}", args.expression()), value))
}
