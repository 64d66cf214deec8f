//! Delivers chat replies after a short "typing" pause.
//!
//! The UI thread computes the reply immediately (the ledger is already
//! updated); the worker only decides when it shows up. Replies are delivered
//! in request order.

use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub struct ReplyRequest {
    pub request_id: u64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReplyEvent {
    Typing { request_id: u64 },
    Delivered { request_id: u64, text: String },
}

pub async fn run_worker(
    mut rx: mpsc::UnboundedReceiver<ReplyRequest>,
    tx: std::sync::mpsc::Sender<ReplyEvent>,
    delay: Duration,
) {
    while let Some(req) = rx.recv().await {
        if tx
            .send(ReplyEvent::Typing {
                request_id: req.request_id,
            })
            .is_err()
        {
            break;
        }

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if tx
            .send(ReplyEvent::Delivered {
                request_id: req.request_id,
                text: req.text,
            })
            .is_err()
        {
            break;
        }
    }
    tracing::debug!("reply worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replies_arrive_in_order() {
        let (req_tx, req_rx) = mpsc::unbounded_channel();
        let (ev_tx, ev_rx) = std::sync::mpsc::channel();
        let worker = tokio::spawn(run_worker(req_rx, ev_tx, Duration::from_millis(1)));

        for (id, text) in [(1, "first"), (2, "second")] {
            req_tx
                .send(ReplyRequest {
                    request_id: id,
                    text: text.to_string(),
                })
                .unwrap();
        }
        drop(req_tx);
        worker.await.unwrap();

        let events: Vec<ReplyEvent> = ev_rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                ReplyEvent::Typing { request_id: 1 },
                ReplyEvent::Delivered { request_id: 1, text: "first".to_string() },
                ReplyEvent::Typing { request_id: 2 },
                ReplyEvent::Delivered { request_id: 2, text: "second".to_string() },
            ]
        );
    }

    #[tokio::test]
    async fn test_worker_stops_when_ui_is_gone() {
        let (req_tx, req_rx) = mpsc::unbounded_channel();
        let (ev_tx, ev_rx) = std::sync::mpsc::channel();
        drop(ev_rx);
        let worker = tokio::spawn(run_worker(req_rx, ev_tx, Duration::ZERO));
        req_tx
            .send(ReplyRequest {
                request_id: 7,
                text: "hi".to_string(),
            })
            .unwrap();
        worker.await.unwrap();
    }
}
