use auto_2048::engine::Board;
use auto_2048::logging;
use auto_2048::strategy::Greedy;

fn main() {
    logging::setup(false);
    let mut greedy = Greedy::new();
    let mut rng = rand::thread_rng();
    let mut board = Board::new_game(&mut rng);
    println!("{}", board);
    let mut move_count = 0;
    while board.can_move() && !board.won() {
        let direction = greedy.best_move(&board);
        if !board.make_move(direction, &mut rng).changed {
            break;
        }
        move_count += 1;
        println!("{}", board);
    }
    println!(
        "Moves made: {}, Score: {}, Highest tile: {}, Status: {:?}",
        move_count,
        board.score(),
        board.highest_tile(),
        board.status()
    );
}
