use super::types::{Artifact, Version};

impl Artifact {
    /// Index the next appended version receives.
    ///
    /// Count-based: `len() + 1`, not `current_index + 1`. The two agree for
    /// any history built only through [`Artifact::append`]; `validate` and the
    /// store's commit check catch the cases where they would not.
    pub fn next_index(&self) -> usize {
        self.contents.len() + 1
    }

    /// Derive a new version from `source` with `content` and return the
    /// extended artifact. `self` is left untouched.
    ///
    /// The new version copies every field of `source` except `index` and
    /// `content`, and becomes the current version.
    #[must_use]
    pub fn append(&self, source: &Version, content: impl Into<String>) -> Artifact {
        let index = self.next_index();
        let version = Version {
            index,
            content: content.into(),
            ..source.clone()
        };

        let mut contents = Vec::with_capacity(self.contents.len() + 1);
        contents.extend_from_slice(&self.contents);
        contents.push(version);

        Artifact {
            current_index: index,
            contents,
        }
    }
}
