// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use sluice_stream::{GateState, GatedSwitchExt};
use sluice_test_utils::fruit::{Apple, Banana};
use sluice_test_utils::test_data::{apple, banana};
use sluice_test_utils::{
    assert_no_element_emitted, assert_stream_ended, collect_values, test_channel, unwrap_stream,
    unwrap_value, Sequenced,
};

#[tokio::test]
async fn test_gated_switch_apples_after_first_banana() -> anyhow::Result<()> {
    // Arrange
    let (banana_tx, bananas) = test_channel::<Sequenced<Banana>>();
    let (apple_tx, apples) = test_channel::<Sequenced<Apple>>();

    let mut result = bananas.gated_switch(apples);

    // Act
    apple_tx.send(Sequenced::new(apple(1)))?;
    banana_tx.send(Sequenced::new(banana(2)))?;
    apple_tx.send(Sequenced::new(apple(3)))?;
    banana_tx.send(Sequenced::new(banana(4)))?;
    apple_tx.send(Sequenced::new(apple(5)))?;
    drop(apple_tx);

    // Assert
    let prices: Vec<u32> = collect_values(&mut result, 500)
        .await
        .into_iter()
        .map(|fruit| fruit.value.price)
        .collect();
    assert_eq!(prices, vec![3, 5]);

    Ok(())
}

#[tokio::test]
async fn test_gated_switch_blocks_payload_until_gate_emits() -> anyhow::Result<()> {
    // Arrange
    let (gate_tx, gate) = test_channel::<Sequenced<Banana>>();
    let (payload_tx, payload) = test_channel::<Sequenced<Apple>>();

    let mut result = gate.gated_switch(payload);

    // Act & Assert
    payload_tx.send(Sequenced::new(apple(1)))?;
    assert_no_element_emitted(&mut result, 100).await;
    assert_eq!(result.gate_state(), GateState::Waiting);

    payload_tx.send(Sequenced::new(apple(2)))?;
    assert_no_element_emitted(&mut result, 100).await;

    gate_tx.send(Sequenced::new(banana(10)))?;
    assert_no_element_emitted(&mut result, 100).await;
    assert_eq!(result.gate_state(), GateState::Opened);

    payload_tx.send(Sequenced::new(apple(3)))?;
    let item = unwrap_value(Some(unwrap_stream(&mut result, 500).await));
    assert_eq!(item.value, apple(3));

    Ok(())
}

#[tokio::test]
async fn test_gated_switch_only_first_gate_value_matters() -> anyhow::Result<()> {
    // Arrange
    let (gate_tx, gate) = test_channel::<Sequenced<Banana>>();
    let (payload_tx, payload) = test_channel::<Sequenced<Apple>>();

    let mut result = gate.gated_switch(payload);

    // Act
    gate_tx.send(Sequenced::new(banana(1)))?;
    payload_tx.send(Sequenced::new(apple(1)))?;
    let first = unwrap_value(Some(unwrap_stream(&mut result, 500).await));

    // Assert: the gate upstream is detached once open
    assert!(!result.is_gate_attached());
    assert!(gate_tx.send(Sequenced::new(banana(2))).is_err());

    payload_tx.send(Sequenced::new(apple(2)))?;
    let second = unwrap_value(Some(unwrap_stream(&mut result, 500).await));

    assert_eq!(first.value, apple(1));
    assert_eq!(second.value, apple(2));
    assert_eq!(result.gate_state(), GateState::Opened);

    Ok(())
}

#[tokio::test]
async fn test_gated_switch_passes_everything_through_in_order() -> anyhow::Result<()> {
    // Arrange
    let (gate_tx, gate) = test_channel::<Sequenced<Banana>>();
    let (payload_tx, payload) = test_channel::<Sequenced<u32>>();

    let mut result = gate.gated_switch(payload);

    // Act
    gate_tx.send(Sequenced::new(banana(0)))?;
    for price in 1..=50 {
        payload_tx.send(Sequenced::new(price))?;
    }
    drop(payload_tx);

    // Assert
    let values: Vec<u32> = collect_values(&mut result, 500)
        .await
        .into_iter()
        .map(Sequenced::into_inner)
        .collect();
    assert_eq!(values, (1..=50).collect::<Vec<_>>());

    Ok(())
}

#[tokio::test]
async fn test_gated_switch_empty_gate_completes_empty() -> anyhow::Result<()> {
    // Arrange
    let (gate_tx, gate) = test_channel::<Sequenced<Banana>>();
    let (payload_tx, payload) = test_channel::<Sequenced<Apple>>();

    let mut result = gate.gated_switch(payload);

    // Act
    payload_tx.send(Sequenced::new(apple(1)))?;
    payload_tx.send(Sequenced::new(apple(2)))?;
    payload_tx.send(Sequenced::new(apple(3)))?;
    drop(gate_tx);

    // Assert
    assert_stream_ended(&mut result, 500).await;
    assert!(!result.is_payload_attached());
    assert!(payload_tx.send(Sequenced::new(apple(4))).is_err());

    Ok(())
}

#[tokio::test]
async fn test_gated_switch_empty_gate_and_empty_payload_completes() -> anyhow::Result<()> {
    // Arrange
    let (gate_tx, gate) = test_channel::<Sequenced<Banana>>();
    let (payload_tx, payload) = test_channel::<Sequenced<Apple>>();

    let mut result = gate.gated_switch(payload);

    // Act
    drop(gate_tx);
    drop(payload_tx);

    // Assert
    assert!(collect_values(&mut result, 500).await.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_gated_switch_gate_completion_after_opening_has_no_effect() -> anyhow::Result<()> {
    // Arrange
    let (gate_tx, gate) = test_channel::<Sequenced<Banana>>();
    let (payload_tx, payload) = test_channel::<Sequenced<Apple>>();

    let mut result = gate.gated_switch(payload);

    // Act
    gate_tx.send(Sequenced::new(banana(1)))?;
    drop(gate_tx);
    payload_tx.send(Sequenced::new(apple(7)))?;
    payload_tx.send(Sequenced::new(apple(8)))?;

    // Assert
    assert_eq!(unwrap_value(Some(unwrap_stream(&mut result, 500).await)).value, apple(7));
    assert_eq!(unwrap_value(Some(unwrap_stream(&mut result, 500).await)).value, apple(8));
    assert_no_element_emitted(&mut result, 100).await;

    drop(payload_tx);
    assert_stream_ended(&mut result, 500).await;

    Ok(())
}

#[tokio::test]
async fn test_gated_switch_payload_completion_while_waiting_completes() -> anyhow::Result<()> {
    // Arrange
    let (gate_tx, gate) = test_channel::<Sequenced<Banana>>();
    let (payload_tx, payload) = test_channel::<Sequenced<Apple>>();

    let mut result = gate.gated_switch(payload);

    // Act
    payload_tx.send(Sequenced::new(apple(1)))?;
    drop(payload_tx);

    // Assert
    assert_stream_ended(&mut result, 500).await;
    assert!(!result.is_gate_attached());
    assert!(gate_tx.send(Sequenced::new(banana(1))).is_err());

    Ok(())
}

#[tokio::test]
async fn test_gated_switch_gate_wins_timestamp_tie() -> anyhow::Result<()> {
    // Arrange
    let (gate_tx, gate) = test_channel::<Sequenced<Banana>>();
    let (payload_tx, payload) = test_channel::<Sequenced<Apple>>();

    let mut result = gate.gated_switch(payload);

    // Act
    payload_tx.send(Sequenced::with_sequence(apple(1), 5))?;
    gate_tx.send(Sequenced::with_sequence(banana(1), 5))?;

    // Assert
    let item = unwrap_value(Some(unwrap_stream(&mut result, 500).await));
    assert_eq!(item.value, apple(1));

    Ok(())
}

#[tokio::test]
async fn test_gated_switch_earlier_payload_ready_with_gate_is_dropped() -> anyhow::Result<()> {
    // Arrange
    let (gate_tx, gate) = test_channel::<Sequenced<Banana>>();
    let (payload_tx, payload) = test_channel::<Sequenced<Apple>>();

    let mut result = gate.gated_switch(payload);

    // Act: both ready in the same poll, payload stamped first
    payload_tx.send(Sequenced::with_sequence(apple(1), 1))?;
    gate_tx.send(Sequenced::with_sequence(banana(1), 2))?;
    payload_tx.send(Sequenced::with_sequence(apple(2), 3))?;

    // Assert
    let item = unwrap_value(Some(unwrap_stream(&mut result, 500).await));
    assert_eq!(item.value, apple(2));
    assert_no_element_emitted(&mut result, 100).await;

    Ok(())
}

#[tokio::test]
async fn test_gated_switch_arrival_order_beats_timestamps() -> anyhow::Result<()> {
    // Arrange
    let (gate_tx, gate) = test_channel::<Sequenced<Banana>>();
    let (payload_tx, payload) = test_channel::<Sequenced<Apple>>();

    let mut result = gate.gated_switch(payload);

    // Act: the payload value is processed before the gate value arrives,
    // even though the gate value carries the smaller timestamp
    payload_tx.send(Sequenced::with_sequence(apple(1), 10))?;
    assert_no_element_emitted(&mut result, 100).await;

    gate_tx.send(Sequenced::with_sequence(banana(1), 1))?;
    payload_tx.send(Sequenced::with_sequence(apple(2), 11))?;

    // Assert
    let item = unwrap_value(Some(unwrap_stream(&mut result, 500).await));
    assert_eq!(item.value, apple(2));

    Ok(())
}
