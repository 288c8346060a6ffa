use crate::profiles::Profile;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryImage {
    pub src: String,
    pub alt: String,
}

/// Photo overlay contents, rebuilt from the profile each time it opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gallery {
    pub profile_id: String,
    pub name: String,
    pub images: Vec<GalleryImage>,
}

impl Gallery {
    pub fn for_profile(profile: &Profile) -> Self {
        let images = profile
            .images
            .iter()
            .enumerate()
            .map(|(index, src)| GalleryImage {
                src: src.clone(),
                alt: format!("{} photo {}", profile.name, index + 1),
            })
            .collect();

        Self {
            profile_id: profile.id.clone(),
            name: profile.name.clone(),
            images,
        }
    }
}
