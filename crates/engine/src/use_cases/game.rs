//! Game session orchestration: session lifecycle, the player-action
//! loop, quests, world state, and NPC management.
//!
//! All mutating operations on a session take its per-session lock, and
//! a player-action turn persists through `save_with_npcs` so the whole
//! step commits or nothing does.

use std::sync::Arc;

use serde_json::Value;

use crate::infrastructure::ports::{
    CharacterRepo, ChatMessage, ClockPort, LlmPort, LlmRequest, NpcRepo, RepoError, SessionRepo,
};
use crate::prompt_templates;
use crate::use_cases::locks::SessionLocks;
use crate::use_cases::npcs::NpcService;
use fableforge_domain::{
    Character, DomainError, GameSession, NewGameSession, NewNpc, NewQuest, Npc, RandomSource,
    SessionId, StoryEntryKind, UserId,
};

/// Probability that any NPC acts after a player action.
const NPC_TURN_CHANCE: f64 = 0.3;
/// Per-NPC probability once the turn fires.
const NPC_ACTION_CHANCE: f64 = 0.5;
/// At most this many NPCs act per turn, in creation order.
const NPC_ACTIONS_PER_TURN: usize = 2;

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// One NPC's contribution to a player-action turn.
#[derive(Debug, Clone, serde::Serialize)]
pub struct NpcActionTaken {
    pub npc_name: String,
    pub action: String,
}

/// Result of `record_player_action`.
#[derive(Debug)]
pub struct PlayerActionOutcome {
    pub narration: String,
    pub npc_actions: Vec<NpcActionTaken>,
    pub session: GameSession,
}

pub struct GameService {
    sessions: Arc<dyn SessionRepo>,
    characters: Arc<dyn CharacterRepo>,
    npcs: Arc<dyn NpcRepo>,
    npc_service: Arc<NpcService>,
    llm: Arc<dyn LlmPort>,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomSource>,
    locks: SessionLocks,
}

impl GameService {
    pub fn new(
        sessions: Arc<dyn SessionRepo>,
        characters: Arc<dyn CharacterRepo>,
        npcs: Arc<dyn NpcRepo>,
        npc_service: Arc<NpcService>,
        llm: Arc<dyn LlmPort>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomSource>,
        locks: SessionLocks,
    ) -> Self {
        Self {
            sessions,
            characters,
            npcs,
            npc_service,
            llm,
            clock,
            random,
            locks,
        }
    }

    async fn get_owned_session(
        &self,
        user_id: UserId,
        id: SessionId,
    ) -> Result<GameSession, GameError> {
        match self.sessions.get(id).await? {
            Some(session) if session.user_id == user_id => Ok(session),
            _ => Err(DomainError::not_found("GameSession", id).into()),
        }
    }

    async fn get_owned_character(
        &self,
        user_id: UserId,
        id: fableforge_domain::CharacterId,
    ) -> Result<Character, GameError> {
        match self.characters.get(id).await? {
            Some(character) if character.user_id == user_id => Ok(character),
            _ => Err(DomainError::not_found("Character", id).into()),
        }
    }

    /// Create a session and generate its opening scene. An unreachable
    /// LLM degrades to a fixed opening line.
    pub async fn create_session(
        &self,
        user_id: UserId,
        req: NewGameSession,
    ) -> Result<GameSession, GameError> {
        if req.name.trim().is_empty() {
            return Err(DomainError::validation("session name is required").into());
        }
        let character = self.get_owned_character(user_id, req.character_id).await?;

        let now = self.clock.now();
        let mut session = GameSession::new(user_id, req, now);
        session.current_location = character.current_location.clone();

        let request = LlmRequest::new(vec![ChatMessage::user(
            prompt_templates::opening_scene_prompt(&character, &session),
        )])
        .with_system_prompt(format!(
            "{}\n\nNarrator personality: {}",
            prompt_templates::GAME_MASTER_SYSTEM_PROMPT, session.narrator_personality
        ))
        .with_temperature(prompt_templates::temperature::NARRATIVE)
        .with_max_tokens(prompt_templates::max_tokens::MEDIUM_RESPONSE);

        let intro = match self.llm.generate(request).await {
            Ok(response) => response.content.trim().to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "opening scene fell back");
                prompt_templates::OPENING_SCENE_FALLBACK.to_string()
            }
        };

        session.current_scene = intro.clone();
        session.story_context = format!("Adventure started with {}", character.name);
        session.add_story_entry(StoryEntryKind::Narration, intro, None, now);

        self.sessions.save(&session).await?;
        tracing::info!(session_id = %session.id, "created game session");
        Ok(session)
    }

    pub async fn get_session(
        &self,
        user_id: UserId,
        id: SessionId,
    ) -> Result<GameSession, GameError> {
        self.get_owned_session(user_id, id).await
    }

    pub async fn list_sessions(&self, user_id: UserId) -> Result<Vec<GameSession>, GameError> {
        Ok(self.sessions.list_for_user(user_id).await?)
    }

    /// Delete a session; its NPCs go with it.
    pub async fn delete_session(&self, user_id: UserId, id: SessionId) -> Result<(), GameError> {
        let _guard = self.locks.acquire(id).await;
        self.get_owned_session(user_id, id).await?;
        self.sessions.delete(id).await?;
        Ok(())
    }

    /// Explicit save: stamps `last_played`.
    pub async fn save_session(&self, user_id: UserId, id: SessionId) -> Result<(), GameError> {
        let _guard = self.locks.acquire(id).await;
        let mut session = self.get_owned_session(user_id, id).await?;
        session.touch(self.clock.now());
        self.sessions.save(&session).await?;
        Ok(())
    }

    /// The primary game-loop operation. Appends the player's action,
    /// narrates the consequence, may trigger autonomous NPC actions,
    /// and persists the whole turn atomically.
    pub async fn record_player_action(
        &self,
        user_id: UserId,
        session_id: SessionId,
        action: &str,
    ) -> Result<PlayerActionOutcome, GameError> {
        if action.trim().is_empty() {
            return Err(DomainError::validation("action is required").into());
        }

        let _guard = self.locks.acquire(session_id).await;
        let mut session = self.get_owned_session(user_id, session_id).await?;
        let now = self.clock.now();

        // 1. Record the action in both logs.
        session.add_player_action(action, None, now);
        session.add_story_entry(
            StoryEntryKind::PlayerAction,
            action,
            Some("Player".to_string()),
            now,
        );

        // 2-3. Narrate the consequence from the session context.
        let context = prompt_templates::session_context(&session);
        let request = LlmRequest::new(vec![ChatMessage::user(
            prompt_templates::player_action_prompt(action),
        )])
        .with_system_prompt(format!(
            "{}\n\nNarrator personality: {}\nContext: {}",
            prompt_templates::GAME_MASTER_SYSTEM_PROMPT, session.narrator_personality, context
        ))
        .with_temperature(prompt_templates::temperature::NARRATIVE)
        .with_max_tokens(prompt_templates::max_tokens::MEDIUM_RESPONSE);

        let narration = match self.llm.generate(request).await {
            Ok(response) => response.content.trim().to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "player action narration fell back");
                prompt_templates::NARRATION_FALLBACK.to_string()
            }
        };
        session.add_story_entry(StoryEntryKind::Narration, narration.clone(), None, now);
        session.current_scene = narration.clone();

        // 4. Autonomous NPC actions: 30% chance of a turn, then up to
        // two NPCs (creation order) act independently at 50% each.
        let mut npc_actions = Vec::new();
        let mut touched_npcs: Vec<Npc> = Vec::new();
        if self.random.roll() < NPC_TURN_CHANCE {
            let candidates = self.npcs.list_for_session(session_id).await?;
            for mut npc in candidates.into_iter().take(NPC_ACTIONS_PER_TURN) {
                if self.random.roll() < NPC_ACTION_CHANCE {
                    let npc_action = self.npc_service.autonomous_action(&mut npc, &session).await;
                    session.add_story_entry(
                        StoryEntryKind::NpcAction,
                        npc_action.clone(),
                        Some(npc.name.clone()),
                        now,
                    );
                    npc_actions.push(NpcActionTaken {
                        npc_name: npc.name.clone(),
                        action: npc_action,
                    });
                    touched_npcs.push(npc);
                }
            }
        }

        // 5-6. Stamp and persist the turn as one unit.
        session.touch(now);
        self.sessions.save_with_npcs(&session, &touched_npcs).await?;

        Ok(PlayerActionOutcome {
            narration,
            npc_actions,
            session,
        })
    }

    /// Create an NPC in a session, defaulting its location to the
    /// session's current location.
    pub async fn create_npc(
        &self,
        user_id: UserId,
        session_id: SessionId,
        req: NewNpc,
    ) -> Result<Npc, GameError> {
        if req.name.trim().is_empty() {
            return Err(DomainError::validation("NPC name is required").into());
        }
        let session = self.get_owned_session(user_id, session_id).await?;
        let npc = Npc::new(session_id, req, &session.current_location, self.clock.now());
        self.npcs.save(&npc).await?;
        Ok(npc)
    }

    pub async fn list_npcs(
        &self,
        user_id: UserId,
        session_id: SessionId,
    ) -> Result<Vec<Npc>, GameError> {
        self.get_owned_session(user_id, session_id).await?;
        Ok(self.npcs.list_for_session(session_id).await?)
    }

    /// Evolve every NPC in the session; returns the change descriptions.
    pub async fn evolve_npcs(
        &self,
        user_id: UserId,
        session_id: SessionId,
    ) -> Result<Vec<String>, GameError> {
        let _guard = self.locks.acquire(session_id).await;
        self.get_owned_session(user_id, session_id).await?;

        let mut npcs = self.npcs.list_for_session(session_id).await?;
        let now = self.clock.now();
        let mut updates = Vec::new();
        for npc in &mut npcs {
            updates.extend(npc.evolve(self.random.as_ref(), now));
        }
        self.npcs.save_all(&npcs).await?;
        Ok(updates)
    }

    /// Add a quest; returns the updated session.
    pub async fn add_quest(
        &self,
        user_id: UserId,
        session_id: SessionId,
        quest: NewQuest,
    ) -> Result<GameSession, GameError> {
        if quest.name.trim().is_empty() {
            return Err(DomainError::validation("quest name is required").into());
        }
        let _guard = self.locks.acquire(session_id).await;
        let mut session = self.get_owned_session(user_id, session_id).await?;
        session.add_quest(quest, self.clock.now());
        self.sessions.save(&session).await?;
        Ok(session)
    }

    /// Complete a quest; unknown ids are a silent no-op.
    pub async fn complete_quest(
        &self,
        user_id: UserId,
        session_id: SessionId,
        quest_id: u32,
    ) -> Result<GameSession, GameError> {
        let _guard = self.locks.acquire(session_id).await;
        let mut session = self.get_owned_session(user_id, session_id).await?;
        if session.complete_quest(quest_id, self.clock.now()) {
            self.sessions.save(&session).await?;
        }
        Ok(session)
    }

    /// Single-key world-state upsert; last write wins.
    pub async fn set_world_state(
        &self,
        user_id: UserId,
        session_id: SessionId,
        key: &str,
        value: Value,
    ) -> Result<GameSession, GameError> {
        if key.trim().is_empty() {
            return Err(DomainError::validation("world-state key is required").into());
        }
        let _guard = self.locks.acquire(session_id).await;
        let mut session = self.get_owned_session(user_id, session_id).await?;
        session.update_world_state(key, value, self.clock.now());
        self.sessions.save(&session).await?;
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::SystemClock;
    use crate::infrastructure::ports::{
        FinishReason, LlmError, LlmResponse, MockCharacterRepo, MockLlmPort, MockNpcRepo,
        MockSessionRepo,
    };
    use fableforge_domain::{NewCharacter, ScriptedRandom};

    struct Fixture {
        sessions: MockSessionRepo,
        characters: MockCharacterRepo,
        npcs: MockNpcRepo,
        llm: MockLlmPort,
        npc_llm: MockLlmPort,
        random: ScriptedRandom,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                sessions: MockSessionRepo::new(),
                characters: MockCharacterRepo::new(),
                npcs: MockNpcRepo::new(),
                llm: MockLlmPort::new(),
                npc_llm: MockLlmPort::new(),
                random: ScriptedRandom::new([], 0),
            }
        }

        fn into_service(self) -> GameService {
            let clock = Arc::new(SystemClock::new());
            GameService::new(
                Arc::new(self.sessions),
                Arc::new(self.characters),
                Arc::new(self.npcs),
                Arc::new(NpcService::new(Arc::new(self.npc_llm), clock.clone())),
                Arc::new(self.llm),
                clock,
                Arc::new(self.random),
                SessionLocks::new(),
            )
        }
    }

    fn owned_character(owner: UserId) -> Character {
        Character::create(
            owner,
            NewCharacter {
                name: "Aldric".to_string(),
                race: "human".to_string(),
                class: "warrior".to_string(),
                attribute_points: Default::default(),
                advantages: vec![],
                disadvantages: vec![],
                background: String::new(),
                notes: String::new(),
            },
            chrono::Utc::now(),
        )
        .expect("valid")
    }

    fn owned_session(owner: UserId, character: &Character) -> GameSession {
        GameSession::new(
            owner,
            NewGameSession {
                name: "The Sunken Keep".to_string(),
                character_id: character.id,
                world_setting: "fantasy".to_string(),
                difficulty: "normal".to_string(),
                narrator_personality: "balanced".to_string(),
            },
            chrono::Utc::now(),
        )
    }

    fn narration_ok(content: &str) -> Result<LlmResponse, LlmError> {
        Ok(LlmResponse {
            content: content.to_string(),
            finish_reason: FinishReason::Stop,
        })
    }

    #[tokio::test]
    async fn create_session_generates_opening_scene() {
        let owner = UserId::new();
        let character = owned_character(owner);

        let mut f = Fixture::new();
        let returned = character.clone();
        f.characters
            .expect_get()
            .returning(move |_| Ok(Some(returned.clone())));
        f.llm
            .expect_generate()
            .returning(|_| narration_ok("A storm rolls in over the keep."));
        f.sessions
            .expect_save()
            .withf(|s: &GameSession| {
                s.story_log.len() == 1
                    && s.current_scene == "A storm rolls in over the keep."
                    && s.story_context.contains("Aldric")
            })
            .returning(|_| Ok(()));

        let service = f.into_service();
        let session = service
            .create_session(
                owner,
                NewGameSession {
                    name: "The Sunken Keep".to_string(),
                    character_id: character.id,
                    world_setting: "fantasy".to_string(),
                    difficulty: "normal".to_string(),
                    narrator_personality: "balanced".to_string(),
                },
            )
            .await
            .expect("creates");
        assert_eq!(session.story_log[0].kind, StoryEntryKind::Narration);
        assert_eq!(session.current_location, character.current_location);
    }

    #[tokio::test]
    async fn create_session_degrades_when_llm_fails() {
        let owner = UserId::new();
        let character = owned_character(owner);

        let mut f = Fixture::new();
        let returned = character.clone();
        f.characters
            .expect_get()
            .returning(move |_| Ok(Some(returned.clone())));
        f.llm
            .expect_generate()
            .returning(|_| Err(LlmError::Timeout(60)));
        f.sessions.expect_save().returning(|_| Ok(()));

        let service = f.into_service();
        let session = service
            .create_session(
                owner,
                NewGameSession {
                    name: "The Sunken Keep".to_string(),
                    character_id: character.id,
                    world_setting: "fantasy".to_string(),
                    difficulty: "normal".to_string(),
                    narrator_personality: "balanced".to_string(),
                },
            )
            .await
            .expect("still creates");
        assert_eq!(session.current_scene, prompt_templates::OPENING_SCENE_FALLBACK);
    }

    #[tokio::test]
    async fn player_action_appends_logs_in_order() {
        let owner = UserId::new();
        let character = owned_character(owner);
        let session = owned_session(owner, &character);
        let session_id = session.id;

        let mut f = Fixture::new();
        f.sessions
            .expect_get()
            .returning(move |_| Ok(Some(session.clone())));
        f.llm
            .expect_generate()
            .returning(|_| narration_ok("The door gives way."));
        // NPC turn does not fire (roll 0.9 >= 0.3).
        f.random = ScriptedRandom::new([0.9], 0);
        f.sessions
            .expect_save_with_npcs()
            .withf(|s: &GameSession, npcs: &[Npc]| {
                npcs.is_empty()
                    && s.player_actions.len() == 1
                    && s.story_log.len() == 2
                    && s.story_log[0].kind == StoryEntryKind::PlayerAction
                    && s.story_log[1].kind == StoryEntryKind::Narration
            })
            .returning(|_, _| Ok(()));

        let service = f.into_service();
        let outcome = service
            .record_player_action(owner, session_id, "I force the door")
            .await
            .expect("acts");
        assert_eq!(outcome.narration, "The door gives way.");
        assert!(outcome.npc_actions.is_empty());
        assert_eq!(outcome.session.current_scene, "The door gives way.");
    }

    #[tokio::test]
    async fn player_action_narration_falls_back() {
        let owner = UserId::new();
        let character = owned_character(owner);
        let session = owned_session(owner, &character);
        let session_id = session.id;

        let mut f = Fixture::new();
        f.sessions
            .expect_get()
            .returning(move |_| Ok(Some(session.clone())));
        f.llm
            .expect_generate()
            .returning(|_| Err(LlmError::RequestFailed("boom".to_string())));
        f.random = ScriptedRandom::new([0.9], 0);
        f.sessions
            .expect_save_with_npcs()
            .returning(|_, _| Ok(()));

        let service = f.into_service();
        let outcome = service
            .record_player_action(owner, session_id, "I look around")
            .await
            .expect("still succeeds");
        assert_eq!(outcome.narration, prompt_templates::NARRATION_FALLBACK);
    }

    #[tokio::test]
    async fn player_action_triggers_npc_turn() {
        let owner = UserId::new();
        let character = owned_character(owner);
        let session = owned_session(owner, &character);
        let session_id = session.id;

        let npc_one = Npc::new(
            session_id,
            NewNpc {
                name: "Garrick".to_string(),
                race: "human".to_string(),
                occupation: String::new(),
                attributes: Default::default(),
                personality_traits: vec![],
                goals_short_term: vec![],
                goals_long_term: vec![],
                fears: vec![],
                current_location: None,
                current_activity: None,
                physical_description: String::new(),
                clothing_description: String::new(),
            },
            "here",
            chrono::Utc::now(),
        );
        let mut npc_two = npc_one.clone();
        npc_two.name = "Mira".to_string();

        let mut f = Fixture::new();
        f.sessions
            .expect_get()
            .returning(move |_| Ok(Some(session.clone())));
        f.llm
            .expect_generate()
            .returning(|_| narration_ok("The market stirs."));
        f.npc_llm
            .expect_generate()
            .returning(|_| narration_ok("sharpens a blade by the forge."));
        let npcs = vec![npc_one, npc_two];
        f.npcs
            .expect_list_for_session()
            .returning(move |_| Ok(npcs.clone()));
        // Turn fires (0.1 < 0.3); first NPC acts (0.2 < 0.5), second does not (0.9).
        f.random = ScriptedRandom::new([0.1, 0.2, 0.9], 0);
        f.sessions
            .expect_save_with_npcs()
            .withf(|s: &GameSession, touched: &[Npc]| {
                touched.len() == 1
                    && touched[0].name == "Garrick"
                    && touched[0].memory_log.len() == 1
                    && s.story_log.iter().filter(|e| e.kind == StoryEntryKind::NpcAction).count()
                        == 1
            })
            .returning(|_, _| Ok(()));

        let service = f.into_service();
        let outcome = service
            .record_player_action(owner, session_id, "I browse the stalls")
            .await
            .expect("acts");
        assert_eq!(outcome.npc_actions.len(), 1);
        assert_eq!(outcome.npc_actions[0].npc_name, "Garrick");
    }

    #[tokio::test]
    async fn player_action_rejects_empty_action() {
        let service = Fixture::new().into_service();
        let err = service
            .record_player_action(UserId::new(), SessionId::new(), "   ")
            .await
            .expect_err("rejects");
        assert!(matches!(err, GameError::Domain(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn foreign_session_is_hidden() {
        let owner = UserId::new();
        let character = owned_character(owner);
        let session = owned_session(owner, &character);
        let session_id = session.id;

        let mut f = Fixture::new();
        f.sessions
            .expect_get()
            .returning(move |_| Ok(Some(session.clone())));
        let service = f.into_service();

        let err = service
            .get_session(UserId::new(), session_id)
            .await
            .expect_err("hidden");
        assert!(matches!(err, GameError::Domain(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn evolve_npcs_saves_and_reports() {
        let owner = UserId::new();
        let character = owned_character(owner);
        let session = owned_session(owner, &character);
        let session_id = session.id;

        let npc = Npc::new(
            session_id,
            NewNpc {
                name: "Garrick".to_string(),
                race: "human".to_string(),
                occupation: String::new(),
                attributes: Default::default(),
                personality_traits: vec![],
                goals_short_term: vec![],
                goals_long_term: vec![],
                fears: vec![],
                current_location: None,
                current_activity: None,
                physical_description: String::new(),
                clothing_description: String::new(),
            },
            "here",
            chrono::Utc::now(),
        );

        let mut f = Fixture::new();
        f.sessions
            .expect_get()
            .returning(move |_| Ok(Some(session.clone())));
        let npcs = vec![npc];
        f.npcs
            .expect_list_for_session()
            .returning(move |_| Ok(npcs.clone()));
        // All three branches fire for the single NPC.
        f.random = ScriptedRandom::new([0.01, 0.01, 0.01], 0);
        f.npcs
            .expect_save_all()
            .withf(|saved: &[Npc]| saved.len() == 1 && saved[0].skill_points == 1)
            .returning(|_| Ok(()));

        let service = f.into_service();
        let updates = service.evolve_npcs(owner, session_id).await.expect("evolves");
        assert_eq!(updates.len(), 3);
        assert!(updates[0].contains("skill point"));
    }

    #[tokio::test]
    async fn quest_lifecycle_via_service() {
        let owner = UserId::new();
        let character = owned_character(owner);
        let session = owned_session(owner, &character);
        let session_id = session.id;

        let mut f = Fixture::new();
        f.sessions
            .expect_get()
            .returning(move |_| Ok(Some(session.clone())));
        f.sessions
            .expect_save()
            .withf(|s: &GameSession| s.active_quests.len() == 1)
            .returning(|_| Ok(()));
        let service = f.into_service();

        let after = service
            .add_quest(
                owner,
                session_id,
                NewQuest {
                    name: "Find the relic".to_string(),
                    description: String::new(),
                    extra: Default::default(),
                },
            )
            .await
            .expect("adds");
        assert_eq!(after.active_quests.len(), 1);
        assert_eq!(after.active_quests[0].id, 1);
    }

    #[tokio::test]
    async fn complete_unknown_quest_is_noop_and_does_not_save() {
        let owner = UserId::new();
        let character = owned_character(owner);
        let session = owned_session(owner, &character);
        let session_id = session.id;

        let mut f = Fixture::new();
        f.sessions
            .expect_get()
            .returning(move |_| Ok(Some(session.clone())));
        f.sessions.expect_save().never();
        let service = f.into_service();

        let after = service
            .complete_quest(owner, session_id, 42)
            .await
            .expect("no-op");
        assert!(after.completed_quests.is_empty());
    }
}
