use reqwest::Client;

/// Name of the directory, next to each document, that holds localized images.
pub const ASSET_DIR_NAME: &str = "images";

/// Extension every encoded asset is written with.
pub const ASSET_EXTENSION: &str = "webp";

const DIGEST_PREFIX_LEN: usize = 8;

/// Short hex digest of a URL string: the first eight characters of its md5.
pub fn url_digest(url: &str) -> String {
    let digest = format!("{:x}", md5::compute(url.as_bytes()));
    digest[..DIGEST_PREFIX_LEN].to_string()
}

/// File name a remote image is stored under, e.g. `1a2b3c4d.webp`.
pub fn asset_file_name(url: &str) -> String {
    format!("{}.{ASSET_EXTENSION}", url_digest(url))
}

/// Target written back into a document for a localized asset.
pub fn local_target(file_name: &str) -> String {
    format!("./{ASSET_DIR_NAME}/{file_name}")
}

/// Prefix that marks a reference as already localized.
pub fn local_prefix() -> String {
    format!("./{ASSET_DIR_NAME}/")
}

pub fn get_http_client() -> reqwest::Result<Client> {
    Client::builder().build()
}
