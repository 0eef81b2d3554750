//! Rules over the images directory.

use super::Check;
use crate::error::Finding;
use crate::images::check_image_file_name;
use crate::normalize::is_under;

pub(super) fn filename(check: &Check<'_>) -> Vec<Finding> {
    check
        .site
        .images
        .iter()
        .filter_map(|image| {
            let name = image.rsplit('/').next().unwrap_or(image);
            check_image_file_name(name)
                .err()
                .map(|message| check.finding(image, message).value(name))
        })
        .collect()
}

pub(super) fn unreferenced(check: &Check<'_>) -> Vec<Finding> {
    let dir = check.site.layout.post_images_dir.as_str();
    let referenced = check.site.referenced_by_posts(&check.config.teaser_field);
    check
        .site
        .images
        .iter()
        .filter(|image| is_under(image, dir) && !referenced.contains(image.as_str()))
        .map(|image| check.finding(image, "Image is not referenced by any post"))
        .collect()
}
