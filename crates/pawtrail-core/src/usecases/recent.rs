//! Recent feed
//!
//! Merges both buckets into one newest-first list. A bucket that fails to
//! list is treated as empty so one broken folder does not hide the other.

use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::{Bucket, RemoteImage};
use crate::ports::IFolderStore;

/// Images shown in the feed when the caller does not choose
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// An image together with the bucket it was listed from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaggedImage {
    pub bucket: Bucket,
    pub image: RemoteImage,
}

/// Lists both buckets concurrently and returns the `limit` newest images
pub async fn recent_images(store: &dyn IFolderStore, limit: usize) -> Vec<TaggedImage> {
    let (lost, found) = tokio::join!(
        store.list_images(Bucket::Lost),
        store.list_images(Bucket::Found)
    );

    let mut merged: Vec<TaggedImage> = Vec::new();
    for (bucket, result) in [(Bucket::Lost, lost), (Bucket::Found, found)] {
        match result {
            Ok(images) => {
                debug!(bucket = %bucket, count = images.len(), "Bucket listed for recent feed");
                merged.extend(images.into_iter().map(|image| TaggedImage { bucket, image }));
            }
            Err(e) => {
                warn!(bucket = %bucket, error = %e, "Skipping bucket in recent feed");
            }
        }
    }

    merged.sort_by(|a, b| b.image.created_time().cmp(&a.image.created_time()));
    merged.truncate(limit);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RemoteError, RemoteId, UploadFile, UploadOutcome};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn image(id: &str, minutes: i64) -> RemoteImage {
        RemoteImage::new(
            RemoteId::new(id.to_string()).unwrap(),
            format!("{id}.jpg"),
            base() + Duration::minutes(minutes),
            None,
            vec![format!("https://example.com/{id}")],
        )
        .unwrap()
    }

    struct FixedStore {
        lost: Result<Vec<RemoteImage>, RemoteError>,
        found: Result<Vec<RemoteImage>, RemoteError>,
    }

    #[async_trait::async_trait]
    impl IFolderStore for FixedStore {
        async fn list_images(&self, bucket: Bucket) -> Result<Vec<RemoteImage>, RemoteError> {
            match bucket {
                Bucket::Lost => self.lost.clone(),
                Bucket::Found => self.found.clone(),
            }
        }

        async fn upload_image(
            &self,
            _file: &UploadFile,
            _bucket: Bucket,
            _description: &str,
        ) -> Result<UploadOutcome, RemoteError> {
            unimplemented!("not used by recent feed tests")
        }

        async fn download_image(&self, _id: &RemoteId) -> Result<Vec<u8>, RemoteError> {
            unimplemented!("not used by recent feed tests")
        }
    }

    fn failure() -> RemoteError {
        RemoteError::List {
            status: Some(404),
            message: "File not found".into(),
        }
    }

    #[tokio::test]
    async fn test_failing_bucket_is_treated_as_empty() {
        let store = FixedStore {
            lost: Err(failure()),
            found: Ok((0..5).map(|i| image(&format!("f{i}"), i)).collect()),
        };

        let feed = recent_images(&store, DEFAULT_RECENT_LIMIT).await;

        let ids: Vec<&str> = feed.iter().map(|t| t.image.id().as_str()).collect();
        assert_eq!(ids, vec!["f4", "f3", "f2", "f1", "f0"]);
        assert!(feed.iter().all(|t| t.bucket == Bucket::Found));
    }

    #[tokio::test]
    async fn test_merges_sorts_and_truncates() {
        let store = FixedStore {
            lost: Ok(vec![image("l1", 10), image("l2", 30), image("l3", 1)]),
            found: Ok(vec![image("f1", 20), image("f2", 40), image("f3", 5)]),
        };

        let feed = recent_images(&store, 4).await;

        let got: Vec<(&str, Bucket)> = feed
            .iter()
            .map(|t| (t.image.id().as_str(), t.bucket))
            .collect();
        assert_eq!(
            got,
            vec![
                ("f2", Bucket::Found),
                ("l2", Bucket::Lost),
                ("f1", Bucket::Found),
                ("l1", Bucket::Lost),
            ]
        );
    }

    #[tokio::test]
    async fn test_both_buckets_failing_gives_empty_feed() {
        let store = FixedStore {
            lost: Err(failure()),
            found: Err(failure()),
        };

        assert!(recent_images(&store, 5).await.is_empty());
    }

    #[tokio::test]
    async fn test_zero_limit() {
        let store = FixedStore {
            lost: Ok(vec![image("l1", 1)]),
            found: Ok(vec![]),
        };

        assert!(recent_images(&store, 0).await.is_empty());
    }
}
