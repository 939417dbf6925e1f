//! Resource type tokens and wire constants
//!
//! Type tokens identify resource kinds to the external engine and match the
//! provider-qualified token format it expects (`pkg:module:Type`).

/// Component type token for the static page component
pub const COMPONENT_STATIC_PAGE: &str = "static-page-component:index:StaticPage";

/// Type token for a storage bucket
pub const TYPE_BUCKET: &str = "aws:s3/bucketV2:BucketV2";

/// Type token for a bucket website configuration
pub const TYPE_BUCKET_WEBSITE: &str =
    "aws:s3/bucketWebsiteConfigurationV2:BucketWebsiteConfigurationV2";

/// Type token for a bucket object
pub const TYPE_BUCKET_OBJECT: &str = "aws:s3/bucketObject:BucketObject";

/// Type token for a bucket public access block
pub const TYPE_PUBLIC_ACCESS_BLOCK: &str =
    "aws:s3/bucketPublicAccessBlock:BucketPublicAccessBlock";

/// Type token for a bucket policy
pub const TYPE_BUCKET_POLICY: &str = "aws:s3/bucketPolicy:BucketPolicy";

/// Engine-computed attribute: the generated bucket name
pub const ATTR_BUCKET_NAME: &str = "bucket";

/// Engine-computed attribute: the website endpoint of a website configuration
pub const ATTR_WEBSITE_ENDPOINT: &str = "websiteEndpoint";

/// Component input carrying the index document body
pub const INPUT_INDEX_CONTENT: &str = "indexContent";

/// Component output carrying the public website endpoint
pub const OUTPUT_ENDPOINT: &str = "endpoint";

/// Sentinel serialized in place of a deferred value that has not resolved yet
///
/// Matches the unknown-value sentinel used on the engine wire, so snapshots
/// of half-resolved declarations stay distinguishable from real strings.
pub const UNKNOWN_VALUE: &str = "04da6b54-80e4-46f7-96ec-b56ff0331ba9";
