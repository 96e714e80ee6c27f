//! End-to-end flows through the queue path: dispatcher, in-memory
//! channels, a fake worker, and the response listener.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::sync::mpsc;
    use tokio::task::JoinHandle;
    use tokio::time::timeout;

    use relay_api::TextProcessor;
    use relay_queue::channel::memory::{request_channel, response_channel};
    use relay_queue::{InboundMessage, OutboundMessage, QueueConfig, QueueProcessor};

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    fn config_ms(ms: u64) -> QueueConfig {
        QueueConfig {
            response_timeout: Duration::from_millis(ms),
        }
    }

    /// Worker that uppercases every request body and mirrors the
    /// correlation attribute, like a well-behaved remote processor.
    fn spawn_uppercase_worker(
        mut requests: mpsc::Receiver<OutboundMessage>,
        responses: mpsc::Sender<InboundMessage>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(request) = requests.recv().await {
                let reply =
                    InboundMessage::reply(request.body.to_uppercase(), request.correlation_id);
                if responses.send(reply).await.is_err() {
                    break;
                }
            }
        })
    }

    // =========================================================================
    // ROUND TRIP
    // =========================================================================

    #[tokio::test]
    async fn test_round_trip_through_channels() {
        let (sender, requests) = request_channel(16);
        let (response_tx, response_rx) = response_channel(16);
        let processor = QueueProcessor::new(Arc::new(sender), config_ms(500));

        tokio::spawn(processor.listener().run(Arc::new(response_rx)));
        let worker = spawn_uppercase_worker(requests, response_tx);

        assert_eq!(processor.process("hello").await.unwrap(), "HELLO");
        assert_eq!(processor.pending_count(), 0);

        drop(processor);
        worker.abort();
    }

    #[tokio::test]
    async fn test_replies_out_of_order_still_correlate() {
        let (sender, mut requests) = request_channel(16);
        let (response_tx, response_rx) = response_channel(16);
        let processor = Arc::new(QueueProcessor::new(Arc::new(sender), config_ms(500)));

        tokio::spawn(processor.listener().run(Arc::new(response_rx)));

        // Collect three requests, then answer them in reverse order.
        tokio::spawn(async move {
            let mut batch = Vec::new();
            for _ in 0..3 {
                batch.push(requests.recv().await.unwrap());
            }
            for request in batch.into_iter().rev() {
                let reply =
                    InboundMessage::reply(request.body.to_uppercase(), request.correlation_id);
                response_tx.send(reply).await.unwrap();
            }
        });

        let calls = ["alpha", "beta", "gamma"].map(|text| {
            let processor = Arc::clone(&processor);
            tokio::spawn(async move { processor.process(text).await.unwrap() })
        });

        let mut results = Vec::new();
        for call in calls {
            results.push(call.await.unwrap());
        }
        assert_eq!(results, ["ALPHA", "BETA", "GAMMA"]);
        assert_eq!(processor.pending_count(), 0);
    }

    // =========================================================================
    // ID UNIQUENESS
    // =========================================================================

    #[tokio::test]
    async fn test_concurrent_calls_use_distinct_ids() {
        const CALLERS: usize = 16;

        let (sender, mut requests) = request_channel(CALLERS);
        let (response_tx, response_rx) = response_channel(CALLERS);
        let processor = Arc::new(QueueProcessor::new(Arc::new(sender), config_ms(1_000)));

        tokio::spawn(processor.listener().run(Arc::new(response_rx)));

        let observer = tokio::spawn(async move {
            let mut seen = HashSet::new();
            for _ in 0..CALLERS {
                let request = requests.recv().await.unwrap();
                seen.insert(request.correlation_id);
                let reply =
                    InboundMessage::reply(request.body.clone(), request.correlation_id);
                response_tx.send(reply).await.unwrap();
            }
            seen
        });

        let calls: Vec<_> = (0..CALLERS)
            .map(|i| {
                let processor = Arc::clone(&processor);
                tokio::spawn(async move { processor.process(&format!("note-{i}")).await.unwrap() })
            })
            .collect();
        for (i, call) in calls.into_iter().enumerate() {
            assert_eq!(call.await.unwrap(), format!("note-{i}"));
        }

        let seen = observer.await.unwrap();
        assert_eq!(seen.len(), CALLERS);
    }

    // =========================================================================
    // TIMEOUT AND LATE REPLIES
    // =========================================================================

    #[tokio::test]
    async fn test_timeout_returns_input_and_late_reply_is_dropped() {
        let (sender, mut requests) = request_channel(16);
        let (response_tx, response_rx) = response_channel(16);
        let processor = QueueProcessor::new(Arc::new(sender), config_ms(30));
        let listener = processor.listener();

        tokio::spawn(listener.run(Arc::new(response_rx)));

        // The caller gives up first; the worker answers long after.
        let late_worker = tokio::spawn(async move {
            let request = requests.recv().await.unwrap();
            tokio::time::sleep(Duration::from_millis(150)).await;
            let reply = InboundMessage::reply("TOO LATE", request.correlation_id);
            response_tx.send(reply).await.unwrap();
        });

        assert_eq!(processor.process("hi").await.unwrap(), "hi");
        assert_eq!(processor.pending_count(), 0);

        // The late delivery lands and is silently dropped
        late_worker.await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(processor.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_race_between_timeout_and_resolution_yields_one_outcome() {
        // Deadline equals worker latency, so resolve and evict race; each
        // iteration must end with exactly one outcome and an empty store.
        let (sender, requests) = request_channel(64);
        let (response_tx, response_rx) = response_channel(64);
        let processor = QueueProcessor::new(Arc::new(sender), config_ms(1));

        tokio::spawn(processor.listener().run(Arc::new(response_rx)));
        let worker = spawn_uppercase_worker(requests, response_tx);

        for i in 0..50 {
            let text = format!("racy-{i}");
            let result = processor.process(&text).await.unwrap();
            assert!(
                result == text || result == text.to_uppercase(),
                "iteration {i} produced neither fallback nor resolution: {result:?}"
            );
            assert_eq!(processor.pending_count(), 0, "iteration {i} leaked an entry");
        }

        drop(processor);
        worker.abort();
    }

    // =========================================================================
    // INSTANCE ISOLATION
    // =========================================================================

    #[tokio::test]
    async fn test_independent_processors_do_not_share_state() {
        let (sender_a, requests_a) = request_channel(16);
        let (sender_b, mut requests_b) = request_channel(16);
        let (response_tx_a, response_rx_a) = response_channel(16);
        let processor_a = QueueProcessor::new(Arc::new(sender_a), config_ms(500));
        let processor_b = QueueProcessor::new(Arc::new(sender_b), config_ms(40));

        tokio::spawn(processor_a.listener().run(Arc::new(response_rx_a)));
        let worker_a = spawn_uppercase_worker(requests_a, response_tx_a);

        // B's worker feeds B's reply into A's listener: wrong instance, so
        // B still times out and A is unaffected.
        let listener_a = processor_a.listener();
        let cross_worker = tokio::spawn(async move {
            let request = requests_b.recv().await.unwrap();
            listener_a.handle(InboundMessage::reply("HIJACKED", request.correlation_id));
        });

        let (a, b) = tokio::join!(processor_a.process("ping"), processor_b.process("pong"));
        assert_eq!(a.unwrap(), "PING");
        assert_eq!(b.unwrap(), "pong");
        assert_eq!(processor_a.pending_count(), 0);
        assert_eq!(processor_b.pending_count(), 0);

        cross_worker.await.unwrap();
        drop(processor_a);
        worker_a.abort();
    }

    // =========================================================================
    // LISTENER ROBUSTNESS UNDER TRAFFIC
    // =========================================================================

    #[tokio::test]
    async fn test_garbage_responses_do_not_disturb_real_traffic() {
        let (sender, mut requests) = request_channel(16);
        let (response_tx, response_rx) = response_channel(16);
        let processor = QueueProcessor::new(Arc::new(sender), config_ms(500));

        tokio::spawn(processor.listener().run(Arc::new(response_rx)));

        tokio::spawn(async move {
            let request = requests.recv().await.unwrap();

            // Garbage first: no id, empty id, unknown id
            for junk in [
                InboundMessage {
                    body: "no id".into(),
                    correlation_id: None,
                },
                InboundMessage {
                    body: "empty id".into(),
                    correlation_id: Some(String::new()),
                },
                InboundMessage {
                    body: "unknown id".into(),
                    correlation_id: Some("11111111-2222-3333-4444-555555555555".into()),
                },
            ] {
                response_tx.send(junk).await.unwrap();
            }

            let reply = InboundMessage::reply(request.body.to_uppercase(), request.correlation_id);
            response_tx.send(reply).await.unwrap();
        });

        let result = timeout(Duration::from_secs(1), processor.process("still works"))
            .await
            .expect("caller must not hang on garbage responses");
        assert_eq!(result.unwrap(), "STILL WORKS");
    }
}
