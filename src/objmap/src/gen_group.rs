//! Generation group analysis
//!
//! Last boss mode eligibility is decided per generation group: a single
//! ineligible member suppresses the whole group.

use crate::placement::PlacementObj;
use crate::reference::ReferenceData;
use std::collections::HashMap;

/// Per-group suppression flags for one map instance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenGroupAnalysis {
    skipped: HashMap<u32, bool>,
}

impl GenGroupAnalysis {
    /// Reduce member eligibility to a per-group `skip` flag.
    ///
    /// The reduction is an OR over ineligible members, so the result does
    /// not depend on the order objects are visited in.
    pub fn analyze<F>(objs: &[PlacementObj], mut should_spawn: F) -> Self
    where
        F: FnMut(&PlacementObj) -> bool,
    {
        let mut skipped: HashMap<u32, bool> = HashMap::new();
        for obj in objs {
            let ineligible = !should_spawn(obj);
            *skipped.entry(obj.gen_group_id).or_insert(false) |= ineligible;
        }
        Self { skipped }
    }

    /// Analyze using the last boss mode rules
    pub fn for_last_boss_mode(objs: &[PlacementObj], refs: &ReferenceData) -> Self {
        Self::analyze(objs, |obj| {
            crate::derive::should_spawn_in_last_boss_mode(obj.unit_config_name(), refs)
        })
    }

    /// Whether any member of the group is ineligible
    pub fn is_skipped(&self, gen_group_id: u32) -> bool {
        self.skipped.get(&gen_group_id).copied().unwrap_or(false)
    }

    /// Whether objects of this group spawn in last boss mode
    pub fn last_boss_mode(&self, gen_group_id: u32) -> bool {
        !self.is_skipped(gen_group_id)
    }

    pub fn group_count(&self) -> usize {
        self.skipped.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::PlacementData;

    fn obj(hash_id: u32, group: u32, name: &str) -> PlacementObj {
        PlacementObj {
            gen_group_id: group,
            data: PlacementData::new(hash_id, name),
        }
    }

    fn eligible(obj: &PlacementObj) -> bool {
        !obj.unit_config_name().starts_with("Enemy_")
    }

    #[test]
    fn test_one_ineligible_member_skips_group() {
        let objs = vec![
            obj(1, 0, "TBox_Field_Wood"),
            obj(2, 0, "Enemy_Bokoblin_Junior"),
            obj(3, 1, "TBox_Field_Wood"),
            obj(4, 1, "Obj_TreeApple_A_01"),
        ];
        let analysis = GenGroupAnalysis::analyze(&objs, eligible);
        assert_eq!(analysis.group_count(), 2);
        assert!(!analysis.last_boss_mode(0));
        assert!(analysis.last_boss_mode(1));
    }

    #[test]
    fn test_order_independent() {
        let mut objs = vec![
            obj(1, 5, "Enemy_Moriblin_Junior"),
            obj(2, 5, "TBox_Field_Wood"),
            obj(3, 5, "Obj_TreeApple_A_01"),
        ];
        let forward = GenGroupAnalysis::analyze(&objs, eligible);
        objs.reverse();
        let backward = GenGroupAnalysis::analyze(&objs, eligible);
        assert_eq!(forward, backward);
        assert!(forward.is_skipped(5));
    }

    #[test]
    fn test_unknown_group_is_not_skipped() {
        let analysis = GenGroupAnalysis::analyze(&[], eligible);
        assert!(analysis.last_boss_mode(42));
    }

    #[test]
    fn test_last_boss_mode_rules() {
        use crate::actor_info::{ActorInfoTable, ActorProfile};
        let refs = ReferenceData {
            actor_info: ActorInfoTable::from_named([
                ("Enemy_Lizalfos_Junior", ActorProfile::new("Enemy")),
                ("TBox_Field_Iron", ActorProfile::new("TBox")),
            ])
            .unwrap(),
            ..Default::default()
        };
        let objs = vec![
            obj(1, 0, "Enemy_Lizalfos_Junior"),
            obj(2, 0, "TBox_Field_Iron"),
            obj(3, 1, "TBox_Field_Iron"),
        ];
        let analysis = GenGroupAnalysis::for_last_boss_mode(&objs, &refs);
        assert!(!analysis.last_boss_mode(0));
        assert!(analysis.last_boss_mode(1));
    }
}
