use crate::error::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rquest::Client;
use rquest_util::Emulation;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Pool of pre-built clients, one per browser identity. Selection is either
/// round-robin or random-per-request; the random strategy can be seeded so
/// tests get a deterministic rotation.
pub struct ClientPool {
    clients: Vec<Client>,
    current: AtomicUsize,
    random: Option<Mutex<StdRng>>,
}

impl ClientPool {
    pub fn new(proxy: Option<&str>, random_impersonate: bool) -> Result<Self> {
        Self::build(proxy, random_impersonate.then(StdRng::from_os_rng))
    }

    /// Random selection driven by a fixed seed.
    pub fn with_seed(proxy: Option<&str>, seed: u64) -> Result<Self> {
        Self::build(proxy, Some(StdRng::seed_from_u64(seed)))
    }

    fn build(proxy: Option<&str>, rng: Option<StdRng>) -> Result<Self> {
        let emulations = vec![
            Emulation::Firefox136,
            Emulation::Chrome133,
            Emulation::Safari18_3,
            Emulation::Edge134,
        ];

        debug!("Creating client pool with {} emulations", emulations.len());

        let clients = emulations
            .into_iter()
            .map(|emulation| {
                let mut builder = Client::builder()
                    .emulation(emulation)
                    .timeout(REQUEST_TIMEOUT);
                if let Some(proxy_url) = proxy {
                    builder = builder.proxy(rquest::Proxy::all(proxy_url)?);
                }
                Ok(builder.build()?)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            clients,
            current: AtomicUsize::new(0),
            random: rng.map(Mutex::new),
        })
    }

    pub fn next_client(&self) -> &Client {
        let index = match &self.random {
            Some(rng) => rng
                .lock()
                .expect("client pool rng lock poisoned")
                .random_range(0..self.clients.len()),
            None => self.current.fetch_add(1, Ordering::SeqCst) % self.clients.len(),
        };
        &self.clients[index]
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
