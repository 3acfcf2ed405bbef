use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use mediator_rust::bus::stream::{self, FrameSink, StreamError, STREAM_START};
use mediator_rust::bus::Notifications;
use mediator_rust::campaigns::CampaignChanged;
use mediator_rust::CancellationToken;
use parking_lot::Mutex;
use tokio::sync::Notify;
use uuid::Uuid;

/// Sink that records every frame and wakes the test after each write.
#[derive(Clone, Default)]
struct RecordingSink {
    frames: Arc<Mutex<Vec<Bytes>>>,
    written: Arc<Notify>,
}

impl RecordingSink {
    fn frames(&self) -> Vec<String> {
        self.frames
            .lock()
            .iter()
            .map(|frame| String::from_utf8_lossy(frame).into_owned())
            .collect()
    }

    async fn wait_for(&self, count: usize) {
        while self.frames.lock().len() < count {
            self.written.notified().await;
        }
    }
}

#[async_trait]
impl FrameSink for RecordingSink {
    async fn write(&mut self, frame: Bytes) -> Result<(), StreamError> {
        self.frames.lock().push(frame);
        self.written.notify_one();
        Ok(())
    }
}

#[tokio::test]
async fn streams_each_event_then_stops_on_cancel() {
    let hub = Notifications::new();
    let sink = RecordingSink::default();
    let token = CancellationToken::new();

    let observer = {
        let hub = hub.clone();
        let mut sink = sink.clone();
        let token = token.clone();
        tokio::spawn(async move {
            stream::observe::<CampaignChanged, _>(&hub, &mut sink, token).await
        })
    };

    // Opening comment means the subscription is in place.
    tokio::time::timeout(Duration::from_secs(5), sink.wait_for(1))
        .await
        .unwrap();
    assert_eq!(hub.subscriber_count::<CampaignChanged>(), 1);

    let ids: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
    for id in &ids {
        assert_eq!(hub.publish(CampaignChanged::new(*id)), 1);
    }
    tokio::time::timeout(Duration::from_secs(5), sink.wait_for(4))
        .await
        .unwrap();

    token.cancel();
    let stats = observer.await.unwrap().unwrap();

    assert_eq!(stats.frames, 3);
    assert_eq!(hub.subscriber_count::<CampaignChanged>(), 0);

    let mut expected = vec![STREAM_START.to_string()];
    expected.extend(ids.iter().map(|id| format!("data: \"{id}\"\n\n")));
    assert_eq!(sink.frames(), expected);

    // Nothing is written after cancellation.
    assert_eq!(hub.publish(CampaignChanged::new(Uuid::new_v4())), 0);
    assert_eq!(sink.frames().len(), 4);
}

#[tokio::test]
async fn events_published_before_subscribing_are_not_streamed() {
    let hub = Notifications::new();
    hub.publish(CampaignChanged::new(Uuid::new_v4()));

    let sink = RecordingSink::default();
    let token = CancellationToken::new();
    let observer = {
        let hub = hub.clone();
        let mut sink = sink.clone();
        let token = token.clone();
        tokio::spawn(async move {
            stream::observe::<CampaignChanged, _>(&hub, &mut sink, token).await
        })
    };
    tokio::time::timeout(Duration::from_secs(5), sink.wait_for(1))
        .await
        .unwrap();

    token.cancel();
    let stats = observer.await.unwrap().unwrap();

    assert_eq!(stats.frames, 0);
    assert_eq!(sink.frames(), vec![STREAM_START.to_string()]);
}

#[tokio::test]
async fn cancelling_right_after_publish_still_writes_every_event() {
    let hub = Notifications::new();
    let sink = RecordingSink::default();
    let token = CancellationToken::new();

    let observer = {
        let hub = hub.clone();
        let mut sink = sink.clone();
        let token = token.clone();
        tokio::spawn(async move {
            stream::observe::<CampaignChanged, _>(&hub, &mut sink, token).await
        })
    };
    tokio::time::timeout(Duration::from_secs(5), sink.wait_for(1))
        .await
        .unwrap();

    let ids: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
    for id in &ids {
        assert_eq!(hub.publish(CampaignChanged::new(*id)), 1);
    }
    token.cancel();

    let stats = observer.await.unwrap().unwrap();

    assert_eq!(stats.frames, 3);
    let mut expected = vec![STREAM_START.to_string()];
    expected.extend(ids.iter().map(|id| format!("data: \"{id}\"\n\n")));
    assert_eq!(sink.frames(), expected);
    assert_eq!(hub.subscriber_count::<CampaignChanged>(), 0);
}
