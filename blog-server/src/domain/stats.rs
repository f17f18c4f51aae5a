//! Statistics over a collection of posts.
//!
//! Every function here is pure and accepts an empty slice. When several
//! candidates share the best score, the one seen first in input order wins.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::post::Post;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorPostCount {
    pub author: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorLikes {
    pub author: String,
    pub likes: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogStats {
    pub total_likes: u64,
    pub favorite_post: Option<Post>,
    pub most_prolific_author: Option<AuthorPostCount>,
    pub most_liked_author: Option<AuthorLikes>,
}

impl BlogStats {
    pub fn from_posts(posts: &[Post]) -> Self {
        Self {
            total_likes: total_likes(posts),
            favorite_post: favorite_post(posts).cloned(),
            most_prolific_author: most_prolific_author(posts),
            most_liked_author: most_liked_author(posts),
        }
    }
}

pub fn total_likes(posts: &[Post]) -> u64 {
    posts.iter().map(|post| u64::from(post.likes)).sum()
}

pub fn favorite_post(posts: &[Post]) -> Option<&Post> {
    posts.iter().fold(None, |best, post| match best {
        Some(current) if current.likes >= post.likes => Some(current),
        _ => Some(post),
    })
}

pub fn most_prolific_author(posts: &[Post]) -> Option<AuthorPostCount> {
    let groups = group_by_author(posts, |_| 1);
    first_max(groups).map(|(author, count)| AuthorPostCount {
        author: author.to_string(),
        count: count as usize,
    })
}

pub fn most_liked_author(posts: &[Post]) -> Option<AuthorLikes> {
    let groups = group_by_author(posts, |post| u64::from(post.likes));
    first_max(groups).map(|(author, likes)| AuthorLikes {
        author: author.to_string(),
        likes,
    })
}

/// Accumulates `weight` per author, keeping authors in first-seen order.
fn group_by_author<F>(posts: &[Post], weight: F) -> Vec<(&str, u64)>
where
    F: Fn(&Post) -> u64,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, u64)> = Vec::new();

    for post in posts {
        let author = post.author.as_str();
        match index.get(author) {
            Some(&slot) => groups[slot].1 += weight(post),
            None => {
                index.insert(author, groups.len());
                groups.push((author, weight(post)));
            }
        }
    }

    groups
}

fn first_max(groups: Vec<(&str, u64)>) -> Option<(&str, u64)> {
    groups.into_iter().fold(None, |best, candidate| match best {
        Some(current) if current.1 >= candidate.1 => Some(current),
        _ => Some(candidate),
    })
}
