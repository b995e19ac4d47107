//! The fixed registry of Microsoft .NET blog feeds.
//!
//! All sources live on `devblogs.microsoft.com`; most are category feeds
//! of the main .NET blog. The registry is compiled in: the set of feeds
//! is part of the product, not runtime configuration.

/// A single syndication source.
#[derive(Debug, Clone, Copy)]
pub struct FeedSource {
    /// Human-readable name, also recorded on every article it produces.
    pub name: &'static str,
    /// Feed endpoint, RSS 2.0 or Atom.
    pub url: &'static str,
    /// Reserved for weighted scheduling; no feed defines one today.
    pub priority: Option<u8>,
}

/// Every feed the pipeline aggregates, in report order.
pub const DOTNET_FEEDS: &[FeedSource] = &[
    FeedSource {
        name: ".NET Blog",
        url: "https://devblogs.microsoft.com/dotnet/feed/",
        priority: None,
    },
    FeedSource {
        name: "Visual Studio Blog",
        url: "https://devblogs.microsoft.com/visualstudio/feed/",
        priority: None,
    },
    FeedSource {
        name: "ASP.NET Blog",
        url: "https://devblogs.microsoft.com/aspnet/feed/",
        priority: None,
    },
    FeedSource {
        name: "C# Language",
        url: "https://devblogs.microsoft.com/dotnet/category/csharp/feed/",
        priority: None,
    },
    FeedSource {
        name: ".NET Announcements",
        url: "https://devblogs.microsoft.com/dotnet/category/announcements/feed/",
        priority: None,
    },
    FeedSource {
        name: ".NET Releases",
        url: "https://devblogs.microsoft.com/dotnet/category/releases/feed/",
        priority: None,
    },
    FeedSource {
        name: "Azure .NET",
        url: "https://devblogs.microsoft.com/dotnet/category/azure/feed/",
        priority: None,
    },
    FeedSource {
        name: ".NET MAUI",
        url: "https://devblogs.microsoft.com/dotnet/category/maui/feed/",
        priority: None,
    },
    FeedSource {
        name: ".NET Performance",
        url: "https://devblogs.microsoft.com/dotnet/category/performance/feed/",
        priority: None,
    },
    FeedSource {
        name: "Entity Framework",
        url: "https://devblogs.microsoft.com/dotnet/category/entity-framework/feed/",
        priority: None,
    },
    FeedSource {
        name: ".NET Core",
        url: "https://devblogs.microsoft.com/dotnet/category/dotnet-core/feed/",
        priority: None,
    },
    FeedSource {
        name: "Blazor",
        url: "https://devblogs.microsoft.com/aspnet/category/blazor/feed/",
        priority: None,
    },
    FeedSource {
        name: ".NET Community",
        url: "https://devblogs.microsoft.com/dotnet/category/community/feed/",
        priority: None,
    },
];
