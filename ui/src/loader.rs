use anyhow::Result;
use futures_channel::oneshot;

/// The one asynchronous operation in the whole app: fetching the dataset at
/// startup. The embedder kicks off its fetch however it likes (XHR, file
/// read, test fixture) and resolves the sender; the event loop polls the
/// receiving half until the bytes arrive.
pub fn begin_fetch() -> (DatasetSender, DatasetFetch) {
    let (tx, rx) = oneshot::channel();
    (DatasetSender(tx), DatasetFetch { rx })
}

pub struct DatasetSender(oneshot::Sender<Result<Vec<u8>>>);

impl DatasetSender {
    pub fn finish(self, result: Result<Vec<u8>>) {
        // If the app already went away, nobody cares about the bytes
        let _ = self.0.send(result);
    }
}

pub struct DatasetFetch {
    rx: oneshot::Receiver<Result<Vec<u8>>>,
}

impl DatasetFetch {
    /// None while the fetch is still in flight. A dropped sender counts as a
    /// failed fetch.
    pub fn poll(&mut self) -> Option<Result<Vec<u8>>> {
        match self.rx.try_recv() {
            Ok(Some(result)) => Some(result),
            Ok(None) => None,
            Err(_) => Some(Err(anyhow!("the dataset fetch was abandoned"))),
        }
    }
}
