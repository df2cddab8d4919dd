/// Per-tab operations within and between groups: delete, move, reorder
///
/// Per-tab delete policy (applied uniformly): deleting the last remaining
/// tab of an active group soft-deletes the whole group with that tab kept,
/// so the content lands in trash instead of vanishing. Deleting from a
/// trashed group removes the tab and purges the group once it empties.
use crate::repository::StashRepository;

impl StashRepository {
    /// Returns false when the group or tab id is gone (benign no-op).
    pub fn delete_tab(&mut self, group_id: &str, tab_id: &str, now_ms: f64) -> bool {
        let groups = self.groups_mut();
        let Some(group_idx) = groups.iter().position(|g| g.id == group_id) else {
            return false;
        };
        let group = &mut groups[group_idx];
        let Some(tab_idx) = group.tabs.iter().position(|t| t.id == tab_id) else {
            return false;
        };

        if !group.is_trashed() && group.tabs.len() == 1 {
            group.deleted_at = Some(now_ms);
            return true;
        }

        group.tabs.remove(tab_idx);
        if group.tabs.is_empty() {
            groups.remove(group_idx);
        }
        true
    }

    /// Move a tab between (or within) groups, inserting immediately before
    /// `before_tab_id` when given and found, else appending. A source group
    /// emptied by a cross-group move is removed outright: its content was
    /// relocated, not discarded.
    pub fn move_tab(
        &mut self,
        from_group_id: &str,
        to_group_id: &str,
        tab_id: &str,
        before_tab_id: Option<&str>,
    ) -> bool {
        let groups = self.groups_mut();
        let Some(from_idx) = groups.iter().position(|g| g.id == from_group_id) else {
            return false;
        };
        let Some(to_idx) = groups.iter().position(|g| g.id == to_group_id) else {
            return false;
        };
        let Some(tab_idx) = groups[from_idx].tabs.iter().position(|t| t.id == tab_id) else {
            return false;
        };

        let tab = groups[from_idx].tabs.remove(tab_idx);

        // Anchor resolved after removal so a same-group move sees the
        // compacted list.
        let dest = &mut groups[to_idx];
        let insert_at = before_tab_id
            .and_then(|before| dest.tabs.iter().position(|t| t.id == before))
            .unwrap_or(dest.tabs.len());
        dest.tabs.insert(insert_at, tab);

        if from_group_id != to_group_id && groups[from_idx].tabs.is_empty() {
            groups.remove(from_idx);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stash_data::{StashGroup, TabItem};

    fn group(urls: &[&str], created_at: f64) -> StashGroup {
        StashGroup::new(
            urls.iter()
                .enumerate()
                .map(|(i, u)| TabItem {
                    id: format!("{u}#{i}"),
                    title: format!("Title {u}"),
                    url: u.to_string(),
                    favicon: Some(format!("{u}/favicon.ico")),
                })
                .collect(),
            created_at,
        )
    }

    #[test]
    fn test_delete_tab_removes_from_group() {
        let g = group(&["https://a", "https://b"], 0.0);
        let gid = g.id.clone();
        let tab_id = g.tabs[0].id.clone();
        let mut repo = StashRepository::new(vec![g]);

        assert!(repo.delete_tab(&gid, &tab_id, 100.0));

        let remaining = repo.find(&gid).unwrap();
        assert_eq!(remaining.tabs.len(), 1);
        assert_eq!(remaining.tabs[0].url, "https://b");
        assert!(!remaining.is_trashed());
    }

    #[test]
    fn test_delete_last_tab_soft_deletes_group_in_place() {
        let g = group(&["https://only"], 0.0);
        let gid = g.id.clone();
        let tab_id = g.tabs[0].id.clone();
        let mut repo = StashRepository::new(vec![g]);

        assert!(repo.delete_tab(&gid, &tab_id, 100.0));

        let trashed = repo.find(&gid).unwrap();
        assert_eq!(trashed.deleted_at, Some(100.0));
        // Content kept: trash is the undo path
        assert_eq!(trashed.tabs.len(), 1);
    }

    #[test]
    fn test_delete_tab_in_trash_purges_when_empty() {
        let mut g = group(&["https://only"], 0.0);
        g.deleted_at = Some(50.0);
        let gid = g.id.clone();
        let tab_id = g.tabs[0].id.clone();
        let mut repo = StashRepository::new(vec![g]);

        assert!(repo.delete_tab(&gid, &tab_id, 100.0));

        assert!(repo.find(&gid).is_none());
    }

    #[test]
    fn test_delete_tab_missing_ids() {
        let g = group(&["https://a"], 0.0);
        let gid = g.id.clone();
        let mut repo = StashRepository::new(vec![g]);

        assert!(!repo.delete_tab("gone", "tab", 0.0));
        assert!(!repo.delete_tab(&gid, "gone", 0.0));
        assert_eq!(repo.groups().len(), 1);
    }

    #[test]
    fn test_move_tab_cross_group_appends() {
        let src = group(&["https://a", "https://b"], 0.0);
        let dst = group(&["https://c"], 10.0);
        let (src_id, dst_id) = (src.id.clone(), dst.id.clone());
        let moved = src.tabs[0].clone();
        let mut repo = StashRepository::new(vec![src, dst]);

        assert!(repo.move_tab(&src_id, &dst_id, &moved.id, None));

        let dest = repo.find(&dst_id).unwrap();
        assert_eq!(dest.tabs.len(), 2);
        // Identity preserved bit-for-bit
        assert_eq!(dest.tabs[1], moved);
        assert_eq!(repo.find(&src_id).unwrap().tabs.len(), 1);
    }

    #[test]
    fn test_move_tab_before_anchor() {
        let src = group(&["https://a"], 0.0);
        let dst = group(&["https://c", "https://d"], 10.0);
        let (src_id, dst_id) = (src.id.clone(), dst.id.clone());
        let tab_id = src.tabs[0].id.clone();
        let anchor = dst.tabs[1].id.clone();
        let mut repo = StashRepository::new(vec![src, dst]);

        assert!(repo.move_tab(&src_id, &dst_id, &tab_id, Some(&anchor)));

        let dest = repo.find(&dst_id).unwrap();
        let urls: Vec<&str> = dest.tabs.iter().map(|t| t.url.as_str()).collect();
        assert_eq!(urls, ["https://c", "https://a", "https://d"]);
    }

    #[test]
    fn test_move_tab_unknown_anchor_appends() {
        let src = group(&["https://a", "https://b"], 0.0);
        let dst = group(&["https://c"], 10.0);
        let (src_id, dst_id) = (src.id.clone(), dst.id.clone());
        let tab_id = src.tabs[0].id.clone();
        let mut repo = StashRepository::new(vec![src, dst]);

        assert!(repo.move_tab(&src_id, &dst_id, &tab_id, Some("missing")));

        assert_eq!(repo.find(&dst_id).unwrap().tabs[1].url, "https://a");
    }

    #[test]
    fn test_move_tab_empties_source_removes_it() {
        let src = group(&["https://a"], 0.0);
        let dst = group(&["https://c"], 10.0);
        let (src_id, dst_id) = (src.id.clone(), dst.id.clone());
        let tab_id = src.tabs[0].id.clone();
        let mut repo = StashRepository::new(vec![src, dst]);

        assert!(repo.move_tab(&src_id, &dst_id, &tab_id, None));

        // Hard removal, not trash: the content was relocated
        assert!(repo.find(&src_id).is_none());
        assert_eq!(repo.groups().len(), 1);
    }

    #[test]
    fn test_move_tab_same_group_reorders() {
        let g = group(&["https://a", "https://b", "https://c"], 0.0);
        let gid = g.id.clone();
        let tab_c = g.tabs[2].id.clone();
        let anchor_a = g.tabs[0].id.clone();
        let mut repo = StashRepository::new(vec![g]);

        assert!(repo.move_tab(&gid, &gid, &tab_c, Some(&anchor_a)));

        let urls: Vec<&str> = repo.find(&gid).unwrap().tabs.iter().map(|t| t.url.as_str()).collect();
        assert_eq!(urls, ["https://c", "https://a", "https://b"]);
        assert_eq!(repo.groups().len(), 1);
    }

    #[test]
    fn test_move_tab_preserves_total_count() {
        let src = group(&["https://a", "https://b"], 0.0);
        let dst = group(&["https://c"], 10.0);
        let (src_id, dst_id) = (src.id.clone(), dst.id.clone());
        let tab_id = src.tabs[1].id.clone();
        let total_before = src.tabs.len() + dst.tabs.len();
        let mut repo = StashRepository::new(vec![src, dst]);

        repo.move_tab(&src_id, &dst_id, &tab_id, None);

        let total_after: usize = repo.groups().iter().map(|g| g.tabs.len()).sum();
        assert_eq!(total_after, total_before);
    }

    #[test]
    fn test_move_tab_missing_groups() {
        let g = group(&["https://a"], 0.0);
        let gid = g.id.clone();
        let tab_id = g.tabs[0].id.clone();
        let mut repo = StashRepository::new(vec![g]);

        assert!(!repo.move_tab("gone", &gid, &tab_id, None));
        assert!(!repo.move_tab(&gid, "gone", &tab_id, None));
        assert!(!repo.move_tab(&gid, &gid, "gone", None));
    }
}
