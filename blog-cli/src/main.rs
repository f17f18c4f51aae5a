use blog_client::{BlogClient, Owner, PostUpdate};
use clap::Parser;
use uuid::Uuid;

#[derive(Parser, Debug)]
struct Cli {
    #[clap(short, long, default_value = "http://127.0.0.1:8080")]
    server: String,

    /// Where the login token is kept between runs.
    #[clap(long, default_value = ".blog_token")]
    token_file: String,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
enum Command {
    Register {
        #[clap(long)]
        username: String,
        #[clap(long)]
        name: Option<String>,
        #[clap(long)]
        password: String,
    },
    Login {
        #[clap(long)]
        username: String,
        #[clap(long)]
        password: String,
    },
    Users,
    List,
    Get {
        id: Uuid,
    },
    Create {
        #[clap(long)]
        title: String,
        #[clap(long, default_value = "")]
        author: String,
        #[clap(long)]
        url: String,
        #[clap(long)]
        likes: Option<u32>,
    },
    Update {
        id: Uuid,
        #[clap(long)]
        title: Option<String>,
        #[clap(long)]
        author: Option<String>,
        #[clap(long)]
        url: Option<String>,
        #[clap(long)]
        likes: Option<u32>,
    },
    Delete {
        id: Uuid,
    },
    Stats,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    let mut client = BlogClient::connect(&args.server)?.with_token_file(&args.token_file);

    match args.command {
        Command::Register {
            username,
            name,
            password,
        } => {
            let user = client
                .register(&username, name.as_deref(), &password)
                .await?;
            println!("Registered {} ({})", user.username, user.id);
        }
        Command::Login { username, password } => {
            client.login(&username, &password).await?;
            println!("Successfully logged in!");
        }
        Command::Users => {
            for user in client.list_users().await? {
                println!(
                    "- {} ({}) {} blogs",
                    user.username,
                    user.name.as_deref().unwrap_or("-"),
                    user.blogs.len()
                );
            }
        }
        Command::List => {
            let posts = client.list_posts().await?;
            println!("Blogs ({})", posts.len());
            for post in posts {
                let owner = match &post.user {
                    Some(Owner::Populated(owner)) => owner.username.clone(),
                    Some(Owner::Id(id)) => id.to_string(),
                    None => "-".to_string(),
                };
                println!("- {} (added by {})", post, owner);
            }
        }
        Command::Get { id } => {
            println!("{}", client.get_post(id).await?);
        }
        Command::Create {
            title,
            author,
            url,
            likes,
        } => {
            let post = client.create_post(&title, &author, &url, likes).await?;
            println!("Blog created! ID: {}", post.id);
        }
        Command::Update {
            id,
            title,
            author,
            url,
            likes,
        } => {
            let update = PostUpdate {
                title,
                author,
                url,
                likes,
            };
            let post = client.update_post(id, &update).await?;
            println!("Blog updated: {}", post);
        }
        Command::Delete { id } => {
            client.delete_post(id).await?;
            println!("Blog deleted!");
        }
        Command::Stats => {
            let stats = client.stats().await?;
            println!("Total likes: {}", stats.total_likes);
            if let Some(post) = stats.favorite_post {
                println!("Favorite: {}", post);
            }
            if let Some(author) = stats.most_prolific_author {
                println!("Most blogs: {}", author);
            }
            if let Some(author) = stats.most_liked_author {
                println!("Most likes: {}", author);
            }
        }
    }

    Ok(())
}
