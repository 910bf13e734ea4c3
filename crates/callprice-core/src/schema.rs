//! Arrow schema and batch conversion for price events.

use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, StringArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;

use crate::{CoreError, PriceEvent};

/// Schema for one row per reported price event.
pub fn price_event_schema() -> Schema {
    Schema::new(vec![
        Field::new("type", DataType::Utf8, false),
        Field::new("value", DataType::Float64, false),
        Field::new("value_cents", DataType::UInt64, false),
        Field::new("corrected", DataType::Boolean, false),
        Field::new("reason", DataType::Utf8, true),
        Field::new("quote", DataType::Utf8, false),
        Field::new("speaker", DataType::Utf8, false),
        Field::new("utterance", DataType::Utf8, false),
    ])
}

/// Columnar view of a call's price events.
pub fn price_events_to_batch(events: &[PriceEvent]) -> Result<RecordBatch, CoreError> {
    let schema: SchemaRef = Arc::new(price_event_schema());

    let kind = StringArray::from(events.iter().map(|e| e.kind.as_str()).collect::<Vec<_>>());
    let value = Float64Array::from(
        events
            .iter()
            .map(|e| e.value.as_dollars())
            .collect::<Vec<_>>(),
    );
    let cents = UInt64Array::from(events.iter().map(|e| e.value.cents()).collect::<Vec<_>>());
    let corrected = BooleanArray::from(events.iter().map(|e| e.corrected).collect::<Vec<_>>());
    let reason = StringArray::from(
        events
            .iter()
            .map(|e| e.reason.map(|r| r.as_str()))
            .collect::<Vec<_>>(),
    );
    let quote = StringArray::from(events.iter().map(|e| e.quote.as_str()).collect::<Vec<_>>());
    let speaker = StringArray::from(
        events
            .iter()
            .map(|e| e.speaker.to_string())
            .collect::<Vec<_>>(),
    );
    let utterance = StringArray::from(
        events
            .iter()
            .map(|e| e.utterance.as_str())
            .collect::<Vec<_>>(),
    );

    let columns: Vec<ArrayRef> = vec![
        Arc::new(kind),
        Arc::new(value),
        Arc::new(cents),
        Arc::new(corrected),
        Arc::new(reason),
        Arc::new(quote),
        Arc::new(speaker),
        Arc::new(utterance),
    ];
    Ok(RecordBatch::try_new(schema, columns)?)
}
