// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Tests for `gated_switch` over subscribable sources.

use sluice_core::{EventSource, SluiceError, SluiceSubject, StreamItem, SubjectError};
use sluice_stream::{gated_switch, GateState};
use sluice_test_utils::fruit::{Apple, Banana};
use sluice_test_utils::test_data::{apple, banana};
use sluice_test_utils::{
    assert_no_element_emitted, assert_stream_ended, collect_values, unwrap_stream, unwrap_value,
    Sequenced,
};

#[tokio::test]
async fn test_gated_switch_source_apples_after_first_banana() -> anyhow::Result<()> {
    // Arrange
    let bananas = SluiceSubject::<Sequenced<Banana>>::new();
    let apples = SluiceSubject::<Sequenced<Apple>>::new();

    let apples_after_first_banana = gated_switch(bananas.clone(), apples.clone());
    let mut output = apples_after_first_banana.subscribe()?;

    // Act
    apples.next(Sequenced::new(apple(1)))?;
    bananas.next(Sequenced::new(banana(2)))?;
    apples.next(Sequenced::new(apple(3)))?;
    bananas.next(Sequenced::new(banana(4)))?;
    apples.next(Sequenced::new(apple(5)))?;
    apples.close();

    // Assert
    let received: Vec<Apple> = collect_values(&mut output, 500)
        .await
        .into_iter()
        .map(Sequenced::into_inner)
        .collect();
    assert_eq!(received, vec![apple(3), apple(5)]);

    Ok(())
}

#[tokio::test]
async fn test_gated_switch_source_ignores_items_sent_before_subscription() -> anyhow::Result<()> {
    // Arrange
    let bananas = SluiceSubject::<Sequenced<Banana>>::new();
    let apples = SluiceSubject::<Sequenced<Apple>>::new();
    let source = gated_switch(bananas.clone(), apples.clone());

    bananas.next(Sequenced::new(banana(1)))?;
    apples.next(Sequenced::new(apple(1)))?;

    // Act
    let mut output = source.subscribe()?;
    apples.next(Sequenced::new(apple(2)))?;

    // Assert: the early banana did not open this subscription's gate
    assert_no_element_emitted(&mut output, 100).await;
    assert_eq!(output.gate_state(), GateState::Waiting);

    bananas.next(Sequenced::new(banana(2)))?;
    apples.next(Sequenced::new(apple(3)))?;
    assert_eq!(unwrap_value(Some(unwrap_stream(&mut output, 500).await)).value, apple(3));

    Ok(())
}

#[tokio::test]
async fn test_gated_switch_source_each_subscription_has_its_own_gate() -> anyhow::Result<()> {
    // Arrange
    let bananas = SluiceSubject::<Sequenced<Banana>>::new();
    let apples = SluiceSubject::<Sequenced<Apple>>::new();
    let source = gated_switch(bananas.clone(), apples.clone());

    let mut early = source.subscribe()?;
    bananas.next(Sequenced::new(banana(1)))?;
    apples.next(Sequenced::new(apple(1)))?;
    assert_eq!(unwrap_value(Some(unwrap_stream(&mut early, 500).await)).value, apple(1));

    // Act
    let mut late = source.subscribe()?;
    apples.next(Sequenced::new(apple(2)))?;

    // Assert
    assert_eq!(unwrap_value(Some(unwrap_stream(&mut early, 500).await)).value, apple(2));
    assert_no_element_emitted(&mut late, 100).await;
    assert_eq!(early.gate_state(), GateState::Opened);
    assert_eq!(late.gate_state(), GateState::Waiting);

    bananas.next(Sequenced::new(banana(2)))?;
    apples.next(Sequenced::new(apple(3)))?;
    assert_eq!(unwrap_value(Some(unwrap_stream(&mut early, 500).await)).value, apple(3));
    assert_eq!(unwrap_value(Some(unwrap_stream(&mut late, 500).await)).value, apple(3));

    Ok(())
}

#[tokio::test]
async fn test_gated_switch_source_releases_gate_when_opened() -> anyhow::Result<()> {
    // Arrange
    let bananas = SluiceSubject::<Sequenced<Banana>>::new();
    let apples = SluiceSubject::<Sequenced<Apple>>::new();
    let mut output = gated_switch(bananas.clone(), apples.clone()).subscribe()?;
    assert_eq!(bananas.subscriber_count(), 1);
    assert_eq!(apples.subscriber_count(), 1);

    // Act
    bananas.next(Sequenced::new(banana(1)))?;
    apples.next(Sequenced::new(apple(1)))?;
    let _ = unwrap_stream(&mut output, 500).await;

    // Assert
    assert_eq!(bananas.subscriber_count(), 0);
    assert_eq!(apples.subscriber_count(), 1);

    Ok(())
}

#[tokio::test]
async fn test_gated_switch_source_empty_gate_releases_payload() -> anyhow::Result<()> {
    // Arrange
    let bananas = SluiceSubject::<Sequenced<Banana>>::new();
    let apples = SluiceSubject::<Sequenced<Apple>>::new();
    let mut output = gated_switch(bananas.clone(), apples.clone()).subscribe()?;

    // Act
    apples.next(Sequenced::new(apple(1)))?;
    apples.next(Sequenced::new(apple(2)))?;
    apples.next(Sequenced::new(apple(3)))?;
    bananas.close();

    // Assert
    assert!(collect_values(&mut output, 500).await.is_empty());
    assert_eq!(apples.subscriber_count(), 0);

    Ok(())
}

#[tokio::test]
async fn test_gated_switch_source_payload_error_before_gate() -> anyhow::Result<()> {
    // Arrange
    let bananas = SluiceSubject::<Sequenced<Banana>>::new();
    let apples = SluiceSubject::<Sequenced<Apple>>::new();
    let mut output = gated_switch(bananas.clone(), apples.clone()).subscribe()?;

    // Act
    apples.error(SluiceError::stream_error("orchard on fire"))?;

    // Assert
    assert!(matches!(
        unwrap_stream(&mut output, 500).await,
        StreamItem::Error(SluiceError::Payload(_))
    ));
    assert_stream_ended(&mut output, 500).await;
    assert_eq!(bananas.subscriber_count(), 0);

    Ok(())
}

#[tokio::test]
async fn test_gated_switch_source_subscribe_fails_on_closed_upstream() {
    // Arrange
    let bananas = SluiceSubject::<Sequenced<Banana>>::new();
    let apples = SluiceSubject::<Sequenced<Apple>>::new();
    let source = gated_switch(bananas.clone(), apples.clone());
    apples.close();

    // Act
    let result = source.subscribe();

    // Assert
    assert!(matches!(result, Err(SubjectError::Closed)));
    assert_eq!(bananas.subscriber_count(), 0);
}

#[tokio::test]
async fn test_gated_switch_source_composes_as_payload() -> anyhow::Result<()> {
    // Arrange
    let first_gate = SluiceSubject::<Sequenced<Banana>>::new();
    let second_gate = SluiceSubject::<Sequenced<Banana>>::new();
    let apples = SluiceSubject::<Sequenced<Apple>>::new();

    let inner = gated_switch(first_gate.clone(), apples.clone());
    let mut output = gated_switch(second_gate.clone(), inner).subscribe()?;

    // Act & Assert: both gates have to open
    first_gate.next(Sequenced::new(banana(1)))?;
    apples.next(Sequenced::new(apple(1)))?;
    assert_no_element_emitted(&mut output, 100).await;

    second_gate.next(Sequenced::new(banana(2)))?;
    apples.next(Sequenced::new(apple(2)))?;
    assert_eq!(unwrap_value(Some(unwrap_stream(&mut output, 500).await)).value, apple(2));

    apples.close();
    assert_stream_ended(&mut output, 500).await;

    Ok(())
}
