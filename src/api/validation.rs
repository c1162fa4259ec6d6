use crate::core::{CustomItem, HorzScaleBehavior, OhlcItem, RawItem, SeriesKind, ValueItem};
use crate::error::{ChartError, ChartResult};

/// Checks one item against the value shape expected by `kind`.
///
/// Whitespace items are always valid.
pub(super) fn validate_item(kind: &SeriesKind, item: &RawItem) -> ChartResult<()> {
    match (kind, item) {
        (_, RawItem::Whitespace(_)) => Ok(()),
        (SeriesKind::Custom(_), RawItem::Custom(item)) => validate_custom_item(item),
        (SeriesKind::Custom(_), other) => Err(ChartError::InvalidData(format!(
            "custom series expects custom items, got {}",
            other.shape_name()
        ))),
        (kind, RawItem::Ohlc(item)) if kind.is_ohlc() => validate_ohlc_item(item),
        (kind, RawItem::Value(item)) if !kind.is_ohlc() && !kind.is_custom() => {
            validate_value_item(item)
        }
        (kind, other) => Err(ChartError::InvalidData(format!(
            "{} series does not accept {} items",
            kind.name(),
            other.shape_name()
        ))),
    }
}

/// Checks that items are strictly ascending by key.
pub(super) fn validate_items_order<H: HorzScaleBehavior>(
    horz_scale: &H,
    items: &[RawItem],
) -> ChartResult<()> {
    let mut previous = None;
    for (position, item) in items.iter().enumerate() {
        let key = horz_scale.key(item.time());
        if let Some(previous) = previous
            && key <= previous
        {
            return Err(ChartError::InvalidData(format!(
                "items must be strictly ascending by time: item {position} has time {key} after {previous}"
            )));
        }
        previous = Some(key);
    }
    Ok(())
}

fn validate_ohlc_item(item: &OhlcItem) -> ChartResult<()> {
    if !item.open.is_finite()
        || !item.high.is_finite()
        || !item.low.is_finite()
        || !item.close.is_finite()
    {
        return Err(ChartError::InvalidData(
            "ohlc values must be finite; use a whitespace item for gaps".to_owned(),
        ));
    }

    if item.low > item.high {
        return Err(ChartError::InvalidData(
            "ohlc low must be <= high".to_owned(),
        ));
    }

    if item.open < item.low || item.open > item.high || item.close < item.low || item.close > item.high
    {
        return Err(ChartError::InvalidData(
            "ohlc open/close must be within low/high range".to_owned(),
        ));
    }
    Ok(())
}

fn validate_value_item(item: &ValueItem) -> ChartResult<()> {
    if !item.value.is_finite() {
        return Err(ChartError::InvalidData(
            "value must be finite; use a whitespace item for gaps".to_owned(),
        ));
    }
    Ok(())
}

fn validate_custom_item(item: &CustomItem) -> ChartResult<()> {
    if item.payload.is_null() {
        return Err(ChartError::InvalidData(
            "custom payload must not be null; use a whitespace item for gaps".to_owned(),
        ));
    }
    Ok(())
}
