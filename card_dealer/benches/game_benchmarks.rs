use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use card_dealer::{
    Card, Channel, DealerSettings, GameKind, Session, Shoe,
    bot::{AceyBot, BlackjackBot, Bot},
    game::hand::BlackjackHand,
    messages::DealerCommand,
    net::errors::ChannelError,
};
use std::hint::black_box;

/// In-process channel where a bot answers the dealer directly
struct BotChannel<B: Bot> {
    bot: B,
    reply: Option<String>,
}

impl<B: Bot> BotChannel<B> {
    fn new(bot: B) -> Self {
        Self { bot, reply: None }
    }
}

impl<B: Bot> Channel for BotChannel<B> {
    fn send(&mut self, message: &str) -> Result<(), ChannelError> {
        let command: DealerCommand = message.parse().map_err(|_| ChannelError::Closed)?;
        self.reply = self.bot.respond(&command).map(|reply| reply.to_string());
        Ok(())
    }

    fn receive(&mut self) -> Result<String, ChannelError> {
        self.reply.take().ok_or(ChannelError::Closed)
    }

    fn close(&mut self) -> Result<(), ChannelError> {
        Ok(())
    }
}

fn cards(tokens: &[&str]) -> Vec<Card> {
    tokens.iter().map(|token| token.parse().unwrap()).collect()
}

/// Benchmark dealing through a whole shoe, reshuffle included
fn bench_shoe_deal(c: &mut Criterion) {
    let mut group = c.benchmark_group("shoe_deal");

    for decks in [1, 7].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{decks}_decks")),
            decks,
            |b, &decks| {
                b.iter_batched(
                    || Shoe::seeded(decks, 42),
                    |mut shoe| {
                        for _ in 0..decks * 52 {
                            black_box(shoe.deal());
                        }
                        shoe
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

/// Benchmark valuing a soft hand that has to demote its aces
fn bench_hand_value(c: &mut Criterion) {
    let hand = cards(&["AS", "AH", "5D", "AC", "9S"]);

    c.bench_function("blackjack_hand_value", |b| {
        b.iter(|| BlackjackHand::from_cards(black_box(&hand)).map(|hand| hand.value()));
    });
}

/// Benchmark parsing the longest dealer commands
fn bench_command_parsing(c: &mut Criterion) {
    let mut shoe = Shoe::seeded(7, 7);
    for _ in 0..300 {
        shoe.deal();
    }
    let dealt: Vec<String> = shoe.dealt_cards().iter().map(ToString::to_string).collect();
    let bet = format!("bet:500:{}", dealt.join(":"));
    let play = format!("play:12:480:5H:JS:dealt:{}", dealt.join(":"));

    c.bench_function("parse_bet_with_dealt_cards", |b| {
        b.iter(|| black_box(&bet).parse::<DealerCommand>());
    });
    c.bench_function("parse_acey_play_with_dealt_cards", |b| {
        b.iter(|| black_box(&play).parse::<DealerCommand>());
    });
}

/// Benchmark a full session played by a bot
fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("session_100_rounds");
    let settings = DealerSettings {
        max_rounds: Some(100),
        seed: Some(42),
        ..Default::default()
    };

    group.bench_function("blackjack", |b| {
        b.iter(|| {
            let channel = BotChannel::new(BlackjackBot::new("bench"));
            let game = GameKind::Blackjack.new_game(&settings);
            Session::new(channel, game, &settings).run()
        });
    });
    group.bench_function("acey", |b| {
        b.iter(|| {
            let channel = BotChannel::new(AceyBot::new("bench"));
            let game = GameKind::AceyDeucey.new_game(&settings);
            Session::new(channel, game, &settings).run()
        });
    });

    group.finish();
}

criterion_group!(shoe_and_hands, bench_shoe_deal, bench_hand_value);

criterion_group!(sessions, bench_command_parsing, bench_session);

criterion_main!(shoe_and_hands, sessions);
