//! StaticPage component: a public static website on bucket storage
//!
//! Declares five child resources under one component: the bucket, its
//! website configuration, the index object, a public access block, and a
//! bucket policy granting anonymous reads. The policy document is derived
//! from the engine-generated bucket name, so it is registered as a
//! continuation on that deferred value.

use serde_json::json;
use static_page_common::tokens::{
    ATTR_BUCKET_NAME, ATTR_WEBSITE_ENDPOINT, OUTPUT_ENDPOINT, TYPE_BUCKET, TYPE_BUCKET_OBJECT,
    TYPE_BUCKET_POLICY, TYPE_BUCKET_WEBSITE, TYPE_PUBLIC_ACCESS_BLOCK,
};
use static_page_common::{ConstructError, Input, Output, ResourceDeclaration};
use tracing::info;

use crate::context::ComponentContext;

/// Inputs for a [`StaticPage`]
#[derive(Debug, Clone)]
pub struct StaticPageArgs {
    /// Body of the index document served at the site root (required)
    pub index_content: Input<String>,
}

/// A constructed static page component
#[derive(Debug, Clone)]
pub struct StaticPage {
    /// Public website endpoint, resolved by the engine after apply
    pub endpoint: Output<String>,
}

/// Bucket policy granting principal `*` read access to all objects
fn allow_get_object_policy(bucket_name: &str) -> Result<String, ConstructError> {
    let document = serde_json::to_string(&json!({
        "Version": "2012-10-17",
        "Statement": [
            {
                "Effect": "Allow",
                "Principal": "*",
                "Action": ["s3:GetObject"],
                "Resource": [format!("arn:aws:s3:::{}/*", bucket_name)]
            }
        ]
    }))?;
    Ok(document)
}

impl StaticPage {
    /// Construct the component: five child declarations, one output
    ///
    /// Single synchronous pass. The one deferred step is the policy
    /// document, which waits on the bucket name; a serialization failure
    /// there fails the construction and is never retried.
    pub fn construct(
        ctx: &mut ComponentContext,
        args: StaticPageArgs,
    ) -> Result<StaticPage, ConstructError> {
        let name = ctx.component_name().to_string();
        info!(component = %name, "Constructing static page component");

        // The bucket owns every other child; its generated name is the only
        // value the engine must report back before apply completes.
        let bucket = format!("{name}-bucket");
        let bucket_name = ctx.register_computed(
            ResourceDeclaration::new(&bucket, TYPE_BUCKET).parent(&name),
            ATTR_BUCKET_NAME,
        );

        let endpoint = ctx.register_computed(
            ResourceDeclaration::new(format!("{name}-website"), TYPE_BUCKET_WEBSITE)
                .parent(&bucket)
                .property("bucket", bucket_name.clone())
                .property("indexDocument", "index.html"),
            ATTR_WEBSITE_ENDPOINT,
        );

        ctx.register(
            ResourceDeclaration::new(format!("{name}-index-object"), TYPE_BUCKET_OBJECT)
                .parent(&bucket)
                .property("bucket", bucket_name.clone())
                .property("key", "index.html")
                .property("content", args.index_content.to_output())
                .property("contentType", "text/html"),
        );

        let access_block = format!("{name}-public-access-block");
        ctx.register(
            ResourceDeclaration::new(&access_block, TYPE_PUBLIC_ACCESS_BLOCK)
                .parent(&bucket)
                .property("bucket", bucket_name.clone())
                .property("blockPublicAcls", false),
        );

        // Public-read policy cannot land before the access block is lifted,
        // hence the explicit ordering edge on top of the parent edge.
        let policy = bucket_name.apply(|bucket_name| allow_get_object_policy(&bucket_name));
        ctx.register(
            ResourceDeclaration::new(format!("{name}-bucket-policy"), TYPE_BUCKET_POLICY)
                .parent(&bucket)
                .property("bucket", bucket_name)
                .property("policy", policy)
                .depends_on(&access_block),
        );

        ctx.publish_output(OUTPUT_ENDPOINT, endpoint.clone());

        Ok(StaticPage { endpoint })
    }
}
