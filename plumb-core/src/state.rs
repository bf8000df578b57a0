//! Agent state snapshots and the state provider trait.

use crate::PlumbResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four categories of agent state a measurement reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateCategory {
    /// Current goals
    Goals,
    /// Recent activity
    RecentContext,
    /// Every memory the agent holds
    AllMemories,
    /// Memories judged relevant to the current goals
    GoalMemories,
}

impl StateCategory {
    pub const ALL: [StateCategory; 4] = [
        Self::Goals,
        Self::RecentContext,
        Self::AllMemories,
        Self::GoalMemories,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Goals => "goals",
            Self::RecentContext => "recent_context",
            Self::AllMemories => "all_memories",
            Self::GoalMemories => "goal_memories",
        }
    }
}

impl fmt::Display for StateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Textual snapshot of agent state for one measurement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentState {
    pub goals: Vec<String>,
    pub recent_context: Vec<String>,
    pub all_memories: Vec<String>,
    pub goal_memories: Vec<String>,
}

impl AgentState {
    /// Texts for one category.
    pub fn category(&self, category: StateCategory) -> &[String] {
        match category {
            StateCategory::Goals => &self.goals,
            StateCategory::RecentContext => &self.recent_context,
            StateCategory::AllMemories => &self.all_memories,
            StateCategory::GoalMemories => &self.goal_memories,
        }
    }

    /// Total number of texts across all categories, duplicates included.
    pub fn text_count(&self) -> usize {
        StateCategory::ALL
            .iter()
            .map(|c| self.category(*c).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.text_count() == 0
    }
}

/// Source of agent state.
///
/// The four accessors are independent; the sensor awaits them concurrently
/// and makes no assumption about their relative completion order.
#[async_trait]
pub trait StateProvider: Send + Sync {
    /// Current goals of the agent.
    async fn goals(&self) -> PlumbResult<Vec<String>>;

    /// Recent activity of the agent.
    async fn recent_context(&self) -> PlumbResult<Vec<String>>;

    /// Memories relevant to the current goals.
    async fn goal_memories(&self) -> PlumbResult<Vec<String>>;

    /// All memories held by the agent.
    async fn all_memories(&self) -> PlumbResult<Vec<String>>;
}
