//! Social share links for an image

use serde::Serialize;
use url::form_urlencoded::byte_serialize;

use super::bucket::Bucket;
use super::newtypes::RemoteId;

/// Public view link that opens the object in the provider's viewer
pub fn shareable_link(id: &RemoteId) -> String {
    format!("https://drive.google.com/file/d/{}/view?usp=sharing", id.as_str())
}

fn encode(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}

/// Ready-made share targets for one image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareLinks {
    pub title: String,
    pub text: String,
    pub link: String,
    pub facebook: String,
    pub twitter: String,
    pub whatsapp: String,
}

impl ShareLinks {
    pub fn new(id: &RemoteId, bucket: Bucket) -> Self {
        let title = match bucket {
            Bucket::Lost => "Lost pet".to_string(),
            Bucket::Found => "Found pet".to_string(),
        };
        let text = format!(
            "Help spread this photo of a {} pet. Share to help!",
            bucket.adjective()
        );
        let link = shareable_link(id);

        let facebook = format!(
            "https://www.facebook.com/sharer/sharer.php?u={}&quote={}",
            encode(&link),
            encode(&text)
        );
        let twitter = format!(
            "https://twitter.com/intent/tweet?text={}&url={}",
            encode(&text),
            encode(&link)
        );
        let whatsapp = format!("https://wa.me/?text={}", encode(&format!("{text} {link}")));

        Self {
            title,
            text,
            link,
            facebook,
            twitter,
            whatsapp,
        }
    }
}
