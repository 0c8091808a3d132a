use crate::surface::TagEvent;
use crate::tag::{Tag, TagId, TagPosition};

/// When an empty store gets the "temp" hint tag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum PlaceholderPolicy {
    Never,
    /// Seed once, the first time the store is checked.
    OnStartup,
    /// Seed every time the store is observed empty.
    #[default]
    WheneverEmpty,
}

/// Ordered tag collection owned by the hosting view.
#[derive(Clone, Debug, Default)]
pub struct TagStore {
    tags: Vec<Tag>,
    policy: PlaceholderPolicy,
    startup_checked: bool,
    revision: u64,
}

impl TagStore {
    pub fn new(policy: PlaceholderPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Bumped on every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get(&self, id: &TagId) -> Option<&Tag> {
        self.tags.iter().find(|tag| tag.id.as_ref() == Some(id))
    }

    fn position_of(&self, id: &TagId) -> Option<usize> {
        self.tags.iter().position(|tag| tag.id.as_ref() == Some(id))
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Appends a centered tag under a fresh id. Blank content leaves the label
    /// to fall back to the tag's index.
    pub fn add_tag(&mut self, content: impl Into<String>) -> TagId {
        let content = content.into();
        let content = if content.trim().is_empty() {
            None
        } else {
            Some(content)
        };
        let id = TagId::fresh();
        log::debug!("adding tag {id} ({content:?})");
        self.tags.push(Tag::new(id.clone(), content));
        self.touch();
        id
    }

    pub fn remove_tag(&mut self, id: &TagId) -> bool {
        let Some(index) = self.position_of(id) else {
            log::debug!("remove ignored, no tag {id}");
            return false;
        };
        self.tags.remove(index);
        self.touch();
        log::debug!("removed tag {id}");
        true
    }

    /// Replaces the position fields of tag `id`; id and content stay as they are.
    pub fn update_tag(&mut self, position: TagPosition, id: &TagId) -> bool {
        let Some(index) = self.position_of(id) else {
            log::debug!("update ignored, no tag {id}");
            return false;
        };
        self.tags[index].position = position;
        self.touch();
        log::debug!(
            "moved tag {id} to {}, {} ({}, {})",
            position.percent_x,
            position.percent_y,
            position.x,
            position.y
        );
        true
    }

    pub fn clear(&mut self) {
        if self.tags.is_empty() {
            return;
        }
        self.tags.clear();
        self.touch();
    }

    /// Seeds the placeholder tag if the store is empty and the policy allows it.
    /// Called once at construction and then at the start of every frame.
    pub fn ensure_placeholder(&mut self) -> bool {
        let first_check = !self.startup_checked;
        self.startup_checked = true;

        if !self.tags.is_empty() {
            return false;
        }
        let seed = match self.policy {
            PlaceholderPolicy::Never => false,
            PlaceholderPolicy::OnStartup => first_check,
            PlaceholderPolicy::WheneverEmpty => true,
        };
        if seed {
            log::debug!("store empty, seeding placeholder tag");
            self.tags.push(Tag::placeholder());
            self.touch();
        }
        seed
    }

    /// Applies one event coming from the surface. Returns whether anything changed.
    pub fn apply(&mut self, event: TagEvent) -> bool {
        match event {
            TagEvent::Added(content) => {
                self.add_tag(content);
                true
            }
            TagEvent::Removed(id) => self.remove_tag(&id),
            TagEvent::Updated { id, position } => self.update_tag(position, &id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PlaceholderPolicy, TagStore};
    use crate::surface::TagEvent;
    use crate::tag::{Percent, TagId, TagPosition};

    fn moved() -> TagPosition {
        TagPosition {
            x: 0.9,
            y: 0.2,
            position_x: 850.0,
            position_y: 200.0,
            percent_x: Percent::new(85.0),
            percent_y: Percent::new(20.0),
        }
    }

    #[test]
    fn add_appends_with_unique_ids() {
        let mut store = TagStore::new(PlaceholderPolicy::Never);
        let a = store.add_tag("cat");
        let b = store.add_tag("dog");
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
        assert_eq!(store.tags()[0].content.as_deref(), Some("cat"));
        assert_eq!(store.tags()[1].content.as_deref(), Some("dog"));
        assert_eq!(store.tags()[1].position, TagPosition::centered());
        assert_eq!(store.revision(), 2);
    }

    #[test]
    fn blank_content_is_stored_as_none() {
        let mut store = TagStore::new(PlaceholderPolicy::Never);
        let id = store.add_tag("   ");
        let tag = store.get(&id).expect("tag added");
        assert_eq!(tag.content, None);
        assert_eq!(tag.label(0), "0");
    }

    #[test]
    fn remove_keeps_other_tags_in_order() {
        let mut store = TagStore::new(PlaceholderPolicy::Never);
        let a = store.add_tag("a");
        let b = store.add_tag("b");
        let c = store.add_tag("c");

        assert!(store.remove_tag(&b));
        let ids: Vec<_> = store.tags().iter().filter_map(|t| t.id.clone()).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn remove_unknown_id_is_a_noop() {
        let mut store = TagStore::new(PlaceholderPolicy::Never);
        store.add_tag("a");
        let before = store.revision();
        assert!(!store.remove_tag(&TagId::new("missing")));
        assert_eq!(store.len(), 1);
        assert_eq!(store.revision(), before);
    }

    #[test]
    fn update_changes_only_position() {
        let mut store = TagStore::new(PlaceholderPolicy::Never);
        let id = store.add_tag("cat");
        let other = store.add_tag("dog");

        assert!(store.update_tag(moved(), &id));
        let tag = store.get(&id).expect("tag present");
        assert_eq!(tag.id.as_ref(), Some(&id));
        assert_eq!(tag.content.as_deref(), Some("cat"));
        assert_eq!(tag.position, moved());
        assert_eq!(store.get(&other).map(|t| t.position), Some(TagPosition::centered()));
        assert!(!store.update_tag(moved(), &TagId::new("missing")));
    }

    #[test]
    fn whenever_empty_reseeds_after_clearing() {
        let mut store = TagStore::new(PlaceholderPolicy::WheneverEmpty);
        assert!(store.ensure_placeholder());
        assert!(!store.ensure_placeholder());
        assert_eq!(store.len(), 1);
        assert!(store.tags()[0].is_placeholder());
        assert_eq!(store.tags()[0].position.percent_x.to_string(), "23%");
        assert_eq!(store.tags()[0].position.percent_y.to_string(), "15%");

        store.remove_tag(&TagId::placeholder());
        assert!(store.is_empty());
        assert!(store.ensure_placeholder());
        assert_eq!(store.len(), 1);
        assert_eq!(store.tags()[0].content.as_deref(), Some("TEMP"));
    }

    #[test]
    fn on_startup_seeds_only_once() {
        let mut store = TagStore::new(PlaceholderPolicy::OnStartup);
        assert!(store.ensure_placeholder());
        store.clear();
        assert!(!store.ensure_placeholder());
        assert!(store.is_empty());
    }

    #[test]
    fn on_startup_skips_seed_when_tags_exist() {
        let mut store = TagStore::new(PlaceholderPolicy::OnStartup);
        store.add_tag("real");
        assert!(!store.ensure_placeholder());
        store.clear();
        assert!(!store.ensure_placeholder());
    }

    #[test]
    fn never_policy_leaves_store_empty() {
        let mut store = TagStore::new(PlaceholderPolicy::Never);
        assert!(!store.ensure_placeholder());
        assert!(store.is_empty());
    }

    #[test]
    fn events_apply_in_order() {
        let mut store = TagStore::new(PlaceholderPolicy::WheneverEmpty);
        store.ensure_placeholder();

        assert!(store.apply(TagEvent::Added("cat".into())));
        let cat = store.tags()[1].id.clone().expect("fresh id");
        assert!(store.apply(TagEvent::Updated {
            id: cat.clone(),
            position: moved(),
        }));
        assert!(store.apply(TagEvent::Removed(TagId::placeholder())));
        assert!(!store.apply(TagEvent::Removed(TagId::placeholder())));

        assert_eq!(store.len(), 1);
        assert_eq!(store.tags()[0].id.as_ref(), Some(&cat));
        assert_eq!(store.tags()[0].position.percent_x.to_string(), "85%");
    }

    #[test]
    fn remove_scenario_keeps_def() {
        let mut store = TagStore::new(PlaceholderPolicy::Never);
        store.tags.push(crate::tag::Tag::new(TagId::new("abc"), Some("a".into())));
        store.tags.push(crate::tag::Tag::new(TagId::new("def"), Some("d".into())));
        store.remove_tag(&TagId::new("abc"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.tags()[0].id, Some(TagId::new("def")));
    }
}
