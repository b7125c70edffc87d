//! Static post catalogue served to the demo client.

use axum::Json;
use serde::Serialize;

/// A post card.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Post {
    pub id: &'static str,
    pub title: &'static str,
    pub image_url: &'static str,
}

static POSTS: [Post; 5] = [
    Post {
        id: "1",
        title: "Post 1",
        image_url: "https://cdn.pixabay.com/photo/2024/10/02/18/24/leaf-9091894_1280.jpg",
    },
    Post {
        id: "2",
        title: "Post 2",
        image_url: "https://cdn.pixabay.com/photo/2023/06/04/20/21/cat-8040862_960_720.jpg",
    },
    Post {
        id: "3",
        title: "Post 3",
        image_url: "https://cdn.pixabay.com/photo/2025/06/26/04/14/bonfire-9681097_640.jpg",
    },
    Post {
        id: "4",
        title: "Post 4",
        image_url: "https://cdn.pixabay.com/photo/2025/06/06/14/39/mountain-9644976_640.jpg",
    },
    Post {
        id: "5",
        title: "Post 5",
        image_url: "https://cdn.pixabay.com/photo/2021/10/29/13/30/love-6751932_640.jpg",
    },
];

/// GET /api/v1/posts - List the fixed posts
pub async fn list_posts() -> Json<&'static [Post]> {
    Json(&POSTS[..])
}
