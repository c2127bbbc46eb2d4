//! NPC autonomy: LLM-driven autonomous actions.
//!
//! Autonomy must never fail the enclosing player-action request: when
//! the LLM is unreachable the NPC falls back to a generic action line.

use std::sync::Arc;

use crate::infrastructure::ports::{ChatMessage, ClockPort, LlmPort, LlmRequest};
use crate::prompt_templates;
use fableforge_domain::{GameSession, Npc};

pub struct NpcService {
    llm: Arc<dyn LlmPort>,
    clock: Arc<dyn ClockPort>,
}

impl NpcService {
    pub fn new(llm: Arc<dyn LlmPort>, clock: Arc<dyn ClockPort>) -> Self {
        Self { llm, clock }
    }

    /// Generate one autonomous action for an NPC, record it in the
    /// NPC's memory log, and stamp `last_interaction`. LLM failures
    /// degrade to a personality-neutral fallback line.
    pub async fn autonomous_action(&self, npc: &mut Npc, session: &GameSession) -> String {
        let context = prompt_templates::npc_context(npc, session);
        let request = LlmRequest::new(vec![ChatMessage::user(format!(
            "{context}\n\n{}",
            prompt_templates::NPC_ACTION_INSTRUCTION
        ))])
        .with_system_prompt(prompt_templates::GAME_MASTER_SYSTEM_PROMPT)
        .with_temperature(prompt_templates::temperature::WORLD_EVENTS)
        .with_max_tokens(prompt_templates::max_tokens::DETAILED_SCENE);

        let action = match self.llm.generate(request).await {
            Ok(response) => response.content.trim().to_string(),
            Err(e) => {
                tracing::warn!(npc = %npc.name, error = %e, "autonomous action fell back");
                prompt_templates::npc_fallback_action(&npc.name)
            }
        };

        let now = self.clock.now();
        npc.add_memory(format!("Autonomous action: {action}"), now);
        npc.last_interaction = now;
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::SystemClock;
    use crate::infrastructure::ports::{FinishReason, LlmError, LlmResponse, MockLlmPort};
    use chrono::Utc;
    use fableforge_domain::{NewGameSession, NewNpc, SessionId, UserId};

    fn fixtures() -> (Npc, GameSession) {
        let session = GameSession::new(
            UserId::new(),
            NewGameSession {
                name: "Test".to_string(),
                character_id: fableforge_domain::CharacterId::new(),
                world_setting: "fantasy".to_string(),
                difficulty: "normal".to_string(),
                narrator_personality: "balanced".to_string(),
            },
            Utc::now(),
        );
        let npc = Npc::new(
            SessionId::new(),
            NewNpc {
                name: "Garrick".to_string(),
                race: "human".to_string(),
                occupation: "blacksmith".to_string(),
                attributes: Default::default(),
                personality_traits: vec!["gruff".to_string()],
                goals_short_term: vec![],
                goals_long_term: vec![],
                fears: vec![],
                current_location: None,
                current_activity: None,
                physical_description: String::new(),
                clothing_description: String::new(),
            },
            "Market Square",
            Utc::now(),
        );
        (npc, session)
    }

    #[tokio::test]
    async fn records_llm_action_in_memory() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate().returning(|_| {
            Ok(LlmResponse {
                content: "Garrick hammers a new blade, glancing at the door.".to_string(),
                finish_reason: FinishReason::Stop,
            })
        });
        let service = NpcService::new(Arc::new(llm), Arc::new(SystemClock::new()));
        let (mut npc, session) = fixtures();
        let before = npc.last_interaction;

        let action = service.autonomous_action(&mut npc, &session).await;

        assert!(action.contains("hammers"));
        assert_eq!(npc.memory_log.len(), 1);
        assert!(npc.memory_log[0].event.starts_with("Autonomous action:"));
        assert!(npc.last_interaction >= before);
    }

    #[tokio::test]
    async fn llm_failure_degrades_to_fallback() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .returning(|_| Err(LlmError::RequestFailed("connection refused".to_string())));
        let service = NpcService::new(Arc::new(llm), Arc::new(SystemClock::new()));
        let (mut npc, session) = fixtures();

        let action = service.autonomous_action(&mut npc, &session).await;

        assert!(action.starts_with("Garrick continues"));
        // The fallback is still recorded as a memory.
        assert_eq!(npc.memory_log.len(), 1);
    }
}
