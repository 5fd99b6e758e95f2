use criterion::{black_box, criterion_group, criterion_main, Criterion};
use quadtris::core::{Board, Session};
use quadtris::types::{Direction, Shape, TICK_MS};

fn bench_tick(c: &mut Criterion) {
    let mut session = Session::new(12345);

    c.bench_function("session_tick_16ms", |b| {
        b.iter(|| {
            if session.is_game_over() {
                session.restart();
            }
            session.tick(black_box(TICK_MS));
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    c.bench_function("clear_4_lines", |b| {
        b.iter(|| {
            let mut board = Board::new(1);
            // Fill bottom 4 rows
            for row in 16..20 {
                for col in 0..10 {
                    board.set(col, row, Some(Shape::I));
                }
            }
            board.clear_full_lines()
        })
    });
}

fn bench_piece_spawn(c: &mut Criterion) {
    let mut board = Board::new(12345);

    c.bench_function("spawn_piece", |b| b.iter(|| board.next_piece()));
}

fn bench_move(c: &mut Criterion) {
    let mut session = Session::new(12345);

    c.bench_function("move_piece", |b| {
        let mut dcol = 1;
        b.iter(|| {
            if !session.move_piece(black_box(dcol), 0) {
                dcol = -dcol;
            }
        })
    });
}

fn bench_rotate(c: &mut Criterion) {
    let mut session = Session::new(12345);
    session.move_piece(0, 4);

    c.bench_function("rotate", |b| {
        b.iter(|| session.rotate(black_box(Direction::Clockwise)))
    });
}

criterion_group!(
    benches,
    bench_tick,
    bench_line_clear,
    bench_piece_spawn,
    bench_move,
    bench_rotate
);
criterion_main!(benches);
