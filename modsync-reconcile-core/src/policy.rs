/// Flags steering how a sync run treats disagreements between descriptor and state row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncPolicy {
    pub force: bool,
    pub db_priority: bool,
    pub json_priority: bool,
    pub dry_run: bool,
}

/// Which store wins a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Rewrite the descriptor to match the state row.
    PreferState,
    /// Rewrite the state row to match the descriptor.
    PreferDescriptor,
}

impl SyncPolicy {
    /// `--db-priority` wins outright; `--force` acts as `--db-priority` unless
    /// `--json-priority` is also given.
    pub fn resolution(&self) -> Option<Resolution> {
        if self.db_priority || (self.force && !self.json_priority) {
            Some(Resolution::PreferState)
        } else if self.json_priority {
            Some(Resolution::PreferDescriptor)
        } else {
            None
        }
    }

    pub fn resolves_conflicts(&self) -> bool {
        self.resolution().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(force: bool, db: bool, json: bool) -> SyncPolicy {
        SyncPolicy {
            force,
            db_priority: db,
            json_priority: json,
            dry_run: false,
        }
    }

    #[test]
    fn force_alone_prefers_state() {
        assert_eq!(policy(true, false, false).resolution(), Some(Resolution::PreferState));
    }

    #[test]
    fn json_priority_beats_force() {
        assert_eq!(
            policy(true, false, true).resolution(),
            Some(Resolution::PreferDescriptor)
        );
    }

    #[test]
    fn db_priority_beats_json_priority() {
        assert_eq!(policy(false, true, true).resolution(), Some(Resolution::PreferState));
    }

    #[test]
    fn no_flags_leave_conflicts_alone() {
        assert!(!SyncPolicy::default().resolves_conflicts());
    }
}
