//! Normalise saved-image filenames back into the URL they came from.
//!
//! Browsers and download tools strip `:` and `/` when turning a URL into a
//! filename, leaving things like `httpsx.comuserstatus123photo1`. Each
//! strategy recognises one platform; they are tried in order and the first
//! one that accepts the input produces the result.

use once_cell::sync::Lazy;
use regex::Regex;

pub struct Strategy {
	pub name: &'static str,
	pub can_handle: fn(&str) -> bool,
	pub parse: fn(&str) -> String,
}

static PIXIV: Lazy<Regex> = Lazy::new(|| compile(r"(\d{8,10})_p\d+"));
static TWITTER: Lazy<Regex> =
	Lazy::new(|| compile(r"https(?:x|twitter)\.com(.*?)status(\d+)(?:photo\d+)?"));
static DANBOORU: Lazy<Regex> = Lazy::new(|| compile(r"^httpsdanbooru\.donmai\.usposts(\d+)$"));
static BILIBILI_OPUS: Lazy<Regex> =
	Lazy::new(|| compile(r"httpswww\.bilibili\.comopus(\d+)(?:#\d+)?"));
static BILIBILI_VIDEO: Lazy<Regex> =
	Lazy::new(|| compile(r"httpswww\.bilibili\.comvideo([a-zA-Z0-9]+)"));

fn compile(pattern: &str) -> Regex {
	Regex::new(pattern).expect("built-in link pattern must compile")
}

/// Tried top to bottom
pub static STRATEGIES: &[Strategy] = &[
	Strategy { name: "pixiv", can_handle: is_pixiv, parse: parse_pixiv },
	Strategy { name: "twitter", can_handle: is_twitter, parse: parse_twitter },
	Strategy { name: "danbooru", can_handle: is_danbooru, parse: parse_danbooru },
	Strategy { name: "bilibili-opus", can_handle: is_bilibili_opus, parse: parse_bilibili_opus },
	Strategy { name: "bilibili-video", can_handle: is_bilibili_video, parse: parse_bilibili_video },
];

/// Returns the canonical URL, or an empty string when nothing matches
pub fn parse(raw: &str) -> String {
	if raw.trim().is_empty() {
		return String::new();
	}

	STRATEGIES
		.iter()
		.find(|strategy| (strategy.can_handle)(raw))
		.map(|strategy| (strategy.parse)(raw))
		.unwrap_or_default()
}

/// Name of the strategy that would handle `raw`, for diagnostics
pub fn matching_strategy(raw: &str) -> Option<&'static str> {
	STRATEGIES
		.iter()
		.find(|strategy| (strategy.can_handle)(raw))
		.map(|strategy| strategy.name)
}

fn first_group(re: &Regex, input: &str) -> Option<String> {
	re.captures(input)
		.and_then(|caps| caps.get(1))
		.map(|m| m.as_str().to_string())
}

fn is_pixiv(input: &str) -> bool {
	PIXIV.is_match(input)
}

fn is_twitter(input: &str) -> bool {
	input.contains("httpsx.com") || input.contains("httpstwitter.com")
}

fn is_danbooru(input: &str) -> bool {
	DANBOORU.is_match(input)
}

fn is_bilibili_opus(input: &str) -> bool {
	BILIBILI_OPUS.is_match(input)
}

fn is_bilibili_video(input: &str) -> bool {
	BILIBILI_VIDEO.is_match(input)
}

fn parse_pixiv(input: &str) -> String {
	first_group(&PIXIV, input)
		.map(|id| format!("https://www.pixiv.net/artworks/{id}"))
		.unwrap_or_default()
}

fn parse_twitter(input: &str) -> String {
	let Some(caps) = TWITTER.captures(input) else {
		// Recognisable as a tweet but not in a shape we can rebuild
		return input.to_string();
	};
	let user = caps.get(1).map_or("", |m| m.as_str());
	let status = caps.get(2).map_or("", |m| m.as_str());

	let user = user.strip_prefix('/').unwrap_or(user);
	let user = user.strip_suffix('/').unwrap_or(user);
	format!("https://x.com/{user}/status/{status}")
}

fn parse_danbooru(input: &str) -> String {
	first_group(&DANBOORU, input)
		.map(|id| format!("https://danbooru.donmai.us/posts/{id}"))
		.unwrap_or_default()
}

fn parse_bilibili_opus(input: &str) -> String {
	first_group(&BILIBILI_OPUS, input)
		.map(|id| format!("https://www.bilibili.com/opus/{id}"))
		.unwrap_or_default()
}

fn parse_bilibili_video(input: &str) -> String {
	first_group(&BILIBILI_VIDEO, input)
		.map(|id| format!("https://www.bilibili.com/video/{id}"))
		.unwrap_or_default()
}
