//! Line-level parsing of edge lists.

use paris_core::graph::FlatGraph;

use crate::errors::EdgeListError;

/// Largest node id accepted; both engines support at most
/// [`FlatGraph::MAX_NODES`] nodes.
pub(crate) const MAX_NODE_ID: usize = FlatGraph::MAX_NODES - 1;

/// One parsed edge.
pub(crate) type Edge = (usize, usize, f64);

/// Parses one line. Returns `Ok(None)` for blank and comment-only lines.
pub(crate) fn parse_line(line_number: usize, raw: &str) -> Result<Option<Edge>, EdgeListError> {
    let content = raw.split_once('#').map_or(raw, |(before, _)| before);
    let mut fields = content
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|field| !field.is_empty());
    let Some(source) = fields.next() else {
        return Ok(None);
    };
    let invalid = |reason: String| EdgeListError::InvalidLine {
        line: line_number,
        reason,
    };
    let target = fields
        .next()
        .ok_or_else(|| invalid("expected `source target [weight]`".to_owned()))?;
    let weight = match fields.next() {
        Some(raw_weight) => parse_weight(raw_weight).map_err(invalid)?,
        None => 1.0,
    };
    if let Some(extra) = fields.next() {
        return Err(invalid(format!("unexpected trailing field `{extra}`")));
    }
    Ok(Some((
        parse_id(source).map_err(invalid)?,
        parse_id(target).map_err(invalid)?,
        weight,
    )))
}

fn parse_id(raw: &str) -> Result<usize, String> {
    let id: usize = raw
        .parse()
        .map_err(|error| format!("invalid node id `{raw}`: {error}"))?;
    if id > MAX_NODE_ID {
        return Err(format!(
            "node id `{raw}` exceeds the largest supported id {MAX_NODE_ID}"
        ));
    }
    Ok(id)
}

fn parse_weight(raw: &str) -> Result<f64, String> {
    let weight: f64 = raw
        .parse()
        .map_err(|error| format!("invalid weight `{raw}`: {error}"))?;
    if !weight.is_finite() || weight < 0.0 {
        return Err(format!("weight `{raw}` must be finite and non-negative"));
    }
    Ok(weight)
}
