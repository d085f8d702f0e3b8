#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use agary::auth::{self, IssuedUser};
use agary::config::AgaryConfig;
use agary::contacts::{store, Contact, NewContact};
use agary::db::{self, SharedDb};
use agary::providers::{
    AssistantProvider, ChatMessage, ProviderError, ResearchProvider, ResearchRequest, EMBEDDING_DIM,
};
use agary::server::AppState;
use async_trait::async_trait;

/// Fresh in-memory database with schema and migrations applied.
pub fn test_db() -> SharedDb {
    db::shared(db::open_memory_database().unwrap())
}

pub fn create_user(db: &SharedDb, name: &str) -> IssuedUser {
    let conn = db.lock().unwrap();
    auth::create_user(&conn, name).unwrap()
}

pub fn insert_contact(
    db: &SharedDb,
    user_id: &str,
    first: &str,
    last: &str,
    company: Option<&str>,
    location: Option<&str>,
) -> Contact {
    let conn = db.lock().unwrap();
    let new = NewContact {
        first_name: first.into(),
        last_name: last.into(),
        company: company.map(Into::into),
        location: location.map(Into::into),
        ..Default::default()
    };
    store::insert_contact(&conn, user_id, &new).unwrap()
}

pub fn load_contact(db: &SharedDb, user_id: &str, id: &str) -> Contact {
    let conn = db.lock().unwrap();
    store::get_contact(&conn, user_id, id).unwrap().unwrap()
}

/// A unit vector with a spike at `seed`. Different seeds are orthogonal.
pub fn spike_embedding(seed: usize) -> Vec<f32> {
    let mut v = vec![0.0f32; EMBEDDING_DIM];
    v[seed % EMBEDDING_DIM] = 1.0;
    v
}

/// Research provider that replays queued responses and records every request.
/// An exhausted queue behaves like a provider with no API key.
#[derive(Default)]
pub struct ScriptedResearch {
    responses: Mutex<VecDeque<Result<String, ProviderError>>>,
    requests: Mutex<Vec<ResearchRequest>>,
}

impl ScriptedResearch {
    pub fn new(responses: Vec<&str>) -> Self {
        let scripted = Self::default();
        for response in responses {
            scripted.push(response);
        }
        scripted
    }

    pub fn push(&self, response: &str) {
        self.responses.lock().unwrap().push_back(Ok(response.to_string()));
    }

    pub fn push_error(&self, status: u16) {
        self.responses.lock().unwrap().push_back(Err(ProviderError::Api {
            provider: "perplexity",
            status,
            body: "upstream unavailable".into(),
        }));
    }

    pub fn requests(&self) -> Vec<ResearchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResearchProvider for ScriptedResearch {
    fn model_name(&self) -> &str {
        "sonar-test"
    }

    async fn research(&self, request: &ResearchRequest) -> Result<String, ProviderError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ProviderError::MissingApiKey { provider: "perplexity" }))
    }
}

/// Assistant provider that embeds text by keyword: the first keyword found in
/// the lowercased text picks the spike. Unmatched text gets the last slot.
pub struct KeywordAssistant {
    keywords: Vec<(&'static str, usize)>,
    reply: Option<String>,
    pub embed_calls: AtomicUsize,
    pub chats: Mutex<Vec<Vec<ChatMessage>>>,
}

impl KeywordAssistant {
    pub fn new(keywords: Vec<(&'static str, usize)>, reply: Option<&str>) -> Self {
        Self {
            keywords,
            reply: reply.map(Into::into),
            embed_calls: AtomicUsize::new(0),
            chats: Mutex::new(Vec::new()),
        }
    }

    fn seed_for(&self, text: &str) -> usize {
        let text = text.to_lowercase();
        self.keywords
            .iter()
            .find(|(keyword, _)| text.contains(keyword))
            .map(|(_, seed)| *seed)
            .unwrap_or(EMBEDDING_DIM - 1)
    }
}

#[async_trait]
impl AssistantProvider for KeywordAssistant {
    fn embedding_model(&self) -> &str {
        "keyword-test"
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        self.embed_calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| spike_embedding(self.seed_for(t))).collect())
    }

    async fn chat(&self, messages: &[ChatMessage], _temperature: f32) -> Result<String, ProviderError> {
        self.chats.lock().unwrap().push(messages.to_vec());
        self.reply.clone().ok_or(ProviderError::Api {
            provider: "openai",
            status: 500,
            body: "chat unavailable".into(),
        })
    }
}

pub fn app_state(
    db: SharedDb,
    research: Arc<dyn ResearchProvider>,
    assistant: Option<Arc<dyn AssistantProvider>>,
) -> AppState {
    AppState {
        db,
        research,
        assistant,
        config: Arc::new(AgaryConfig::default()),
    }
}
