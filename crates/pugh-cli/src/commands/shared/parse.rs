use pugh_core::scale::Scale;

/// Parse a scale argument: `binary`, `unbounded`, or `MIN..MAX[:STEP]`.
pub fn parse_scale(raw: &str) -> anyhow::Result<Scale> {
    let trimmed = raw.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "binary" => return Ok(Scale::Binary),
        "unbounded" => return Ok(Scale::Unbounded),
        _ => {}
    }

    let (range, step) = match trimmed.split_once(':') {
        Some((range, step)) => (range, Some(step)),
        None => (trimmed, None),
    };
    let Some((min, max)) = range.split_once("..") else {
        anyhow::bail!("invalid scale '{raw}': expected binary, unbounded, or MIN..MAX[:STEP]");
    };
    let min = parse_number(min, "scale minimum")?;
    let max = parse_number(max, "scale maximum")?;
    let step = step.map_or(Ok(1.0), |s| parse_number(s, "scale step"))?;

    if min >= max {
        anyhow::bail!("invalid scale '{raw}': minimum must be below maximum");
    }
    if step <= 0.0 {
        anyhow::bail!("invalid scale '{raw}': step must be positive");
    }
    Ok(Scale::Numeric {
        min,
        max,
        step,
        labels: Vec::new(),
    })
}

fn parse_number(raw: &str, field: &str) -> anyhow::Result<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))?;
    if !value.is_finite() {
        anyhow::bail!("invalid {field} '{raw}': must be finite");
    }
    Ok(value)
}
