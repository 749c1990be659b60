//! Shared test utilities: scripted collaborators for driving a session

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use url::Url;

use trip_concierge::{
    Collaborators, Completion, Error, FlowSettings, ImageSearch, Result, SessionFlow,
    SpeechSynthesizer, Transcriber,
};

/// Hears each scripted utterance once, then nothing
#[derive(Default)]
pub struct ScriptedTranscriber {
    heard: Mutex<VecDeque<Option<String>>>,
}

impl ScriptedTranscriber {
    pub fn push(&self, heard: Option<&str>) {
        self.heard
            .lock()
            .unwrap()
            .push_back(heard.map(str::to_string));
    }
}

#[async_trait]
impl Transcriber for ScriptedTranscriber {
    async fn transcribe(&self) -> Option<String> {
        self.heard.lock().unwrap().pop_front().flatten()
    }
}

/// Replies with scripted responses and records every prompt it receives
#[derive(Default)]
pub struct ScriptedCompletion {
    replies: Mutex<VecDeque<std::result::Result<String, String>>>,
    prompts: Mutex<Vec<(String, String, u32)>>,
}

impl ScriptedCompletion {
    pub fn reply(&self, text: &str) {
        self.replies.lock().unwrap().push_back(Ok(text.to_string()));
    }

    pub fn fail(&self, message: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }

    /// User prompts received, in order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .map(|(_, user, _)| user.clone())
            .collect()
    }

    /// System instructions of the last call
    pub fn last_system(&self) -> Option<String> {
        self.prompts
            .lock()
            .unwrap()
            .last()
            .map(|(system, _, _)| system.clone())
    }

    /// Token cap of the last call
    pub fn last_max_tokens(&self) -> Option<u32> {
        self.prompts.lock().unwrap().last().map(|(_, _, max)| *max)
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl Completion for ScriptedCompletion {
    async fn complete(
        &self,
        system_instructions: &str,
        user_prompt: &str,
        max_output_tokens: u32,
    ) -> Result<String> {
        self.prompts.lock().unwrap().push((
            system_instructions.to_string(),
            user_prompt.to_string(),
            max_output_tokens,
        ));

        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(Error::Completion(message)),
            None => Err(Error::Completion("no scripted reply".to_string())),
        }
    }
}

/// Returns fixed photo URLs, or fails every search
#[derive(Default)]
pub struct FakeImageSearch {
    failure: Mutex<Option<String>>,
    queries: Mutex<Vec<(String, usize)>>,
}

impl FakeImageSearch {
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn queries(&self) -> Vec<(String, usize)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageSearch for FakeImageSearch {
    async fn search_images(&self, query: &str, count: usize) -> Result<Vec<Url>> {
        self.queries
            .lock()
            .unwrap()
            .push((query.to_string(), count));

        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(Error::ImageSearch(message));
        }

        (0..count)
            .map(|i| Ok(Url::parse(&format!("https://images.test/{query}/{i}.jpg"))?))
            .collect()
    }
}

/// Counts synthesis calls; optionally fails them
#[derive(Default)]
pub struct CountingSynthesizer {
    calls: AtomicUsize,
    texts: Mutex<Vec<String>>,
    failure: Mutex<Option<String>>,
}

impl CountingSynthesizer {
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn succeed(&self) {
        *self.failure.lock().unwrap() = None;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechSynthesizer for CountingSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.texts.lock().unwrap().push(text.to_string());

        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(Error::Tts(message));
        }

        Ok(format!("audio-{call}").into_bytes())
    }
}

/// Handles on the fakes behind a session
#[derive(Default, Clone)]
pub struct Fakes {
    pub transcriber: Arc<ScriptedTranscriber>,
    pub completion: Arc<ScriptedCompletion>,
    pub images: Arc<FakeImageSearch>,
    pub speech: Arc<CountingSynthesizer>,
}

impl Fakes {
    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            transcriber: self.transcriber.clone(),
            completion: self.completion.clone(),
            images: self.images.clone(),
            speech: self.speech.clone(),
        }
    }

    /// A fresh session wired to these fakes with default settings
    pub fn flow(&self) -> SessionFlow {
        self.flow_with(FlowSettings::default())
    }

    pub fn flow_with(&self, settings: FlowSettings) -> SessionFlow {
        SessionFlow::new(self.collaborators(), settings)
    }
}

pub const MUMBAI_JAIPUR: &str =
    "I want to travel from Mumbai to Jaipur for 4 days with a budget of 6000";

pub const MUMBAI_JAIPUR_DETAILS: &str = "Source: Mumbai\nDestination: Jaipur\nDays: 4\nBudget: 6000";

pub const JAIPUR_ITINERARY: &str = "## Day 1: Arrival\n\
    * Check in near **Hawa Mahal**\n\
    * Street food at Johari Bazaar (~₹400)\n\
    \n\
    ## Day 2: Forts\n\
    - Amber Fort\n\
    - Nahargarh sunset\n";
