//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::clock::{SystemClock, SystemRandom};
use crate::infrastructure::ports::{
    CharacterRepo, ClockPort, LlmPort, NpcRepo, SessionRepo, UserRepo,
};
use crate::infrastructure::session_store::SessionStore;
use crate::use_cases::{
    AuthService, CharacterLocks, CharacterService, GameService, NpcService, SessionLocks,
    ShopService,
};
use fableforge_domain::RandomSource;

/// Main application state.
///
/// Holds all use-case services. Passed to HTTP handlers via Axum state.
pub struct App {
    pub auth: AuthService,
    pub characters: CharacterService,
    pub game: GameService,
    pub shop: ShopService,
    /// Token store shared with the cookie-auth extractor.
    pub auth_sessions: Arc<SessionStore>,
}

impl App {
    /// Wire the application from its ports.
    pub fn new(
        users: Arc<dyn UserRepo>,
        characters: Arc<dyn CharacterRepo>,
        sessions: Arc<dyn SessionRepo>,
        npcs: Arc<dyn NpcRepo>,
        llm: Arc<dyn LlmPort>,
    ) -> Self {
        let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
        let random: Arc<dyn RandomSource> = Arc::new(SystemRandom::new());
        Self::with_parts(users, characters, sessions, npcs, llm, clock, random)
    }

    /// Wiring with explicit clock and random sources (for tests).
    pub fn with_parts(
        users: Arc<dyn UserRepo>,
        characters: Arc<dyn CharacterRepo>,
        sessions: Arc<dyn SessionRepo>,
        npcs: Arc<dyn NpcRepo>,
        llm: Arc<dyn LlmPort>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        let auth_sessions = Arc::new(SessionStore::new());
        let npc_service = Arc::new(NpcService::new(llm.clone(), clock.clone()));
        let session_locks = SessionLocks::new();
        // One character-lock table shared by every path that mutates a
        // character, so shop buys and direct updates serialize together.
        let character_locks = CharacterLocks::new();

        Self {
            auth: AuthService::new(users, auth_sessions.clone(), clock.clone()),
            characters: CharacterService::new(
                characters.clone(),
                clock.clone(),
                character_locks.clone(),
            ),
            game: GameService::new(
                sessions,
                characters.clone(),
                npcs,
                npc_service,
                llm.clone(),
                clock.clone(),
                random,
                session_locks,
            ),
            shop: ShopService::new(characters, llm, clock, character_locks),
            auth_sessions,
        }
    }
}
